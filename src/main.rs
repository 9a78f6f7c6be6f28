use {
    std::process,
    hermitmux::{
        logger::{self, Log, micro::*},
        Config, Ctx, Router, RouteError, Server,
    },
};

fn main() {
    let config = Config::from_env();
    if let Err(e) = logger::init_stdout_logger(config.log_buffer, config.log_level) {
        eprintln!("failed to init logger: {}", e);
    }

    let router = match set_up_routes() {
        Ok(r) => r,
        Err(e) => {
            error!("invalid route: {}", e);
            process::exit(1);
        },
    };

    info!("# of lines: {}", config.max_lines);
    let result = Server::bind(&config).and_then(|s| s.serve(router));
    if let Err(e) = result {
        error!("server exited: {}", e);
        log::logger().flush();
        process::exit(1);
    }
}

fn set_up_routes() -> Result<Router, RouteError> {
    let mut router = Router::new();
    router.get("/users", handle_find_users)?;
    router.post("/users", handle_create_user)?;
    router.get("/users/:id", handle_find_user_by_id)?;
    router.put("/users/:id", handle_update_user_by_id)?;
    router.delete("/users/:id", handle_delete_user_by_id)?;
    Ok(router)
}

fn respond_json(ctx: &mut Ctx, body: String) {
    let res = ctx.res();
    res.set_header("Content-Type", "application/json");
    if let Err(e) = res.respond(body.as_bytes()) {
        error!("failed to respond: {}", e);
    }
}

fn handle_find_users(ctx: &mut Ctx) {
    respond_json(ctx, r#"[{"id": 123, "name": "someone"}]"#.to_string());
}

fn handle_create_user(ctx: &mut Ctx) {
    if let Err(e) = ctx.res().write_status(201) {
        error!("failed to respond: {}", e);
    }
}

fn handle_find_user_by_id(ctx: &mut Ctx) {
    let id = ctx.var("id").unwrap_or_default().to_string();
    respond_json(ctx, format!(r#"{{"id": {}, "name": "someone"}}"#, id));
}

fn handle_update_user_by_id(ctx: &mut Ctx) {
    hermitmux::not_found(ctx);
}

fn handle_delete_user_by_id(ctx: &mut Ctx) {
    if let Err(e) = ctx.res().write_status(200) {
        error!("failed to respond: {}", e);
    }
}
