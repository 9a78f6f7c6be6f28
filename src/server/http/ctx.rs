use {
    std::{any::Any, collections},
    super::{
        headers::*,
        matcher::Vars,
        req::Req,
        res::Res,
    },
    crate::logger::micro::*,
};

/// Everything a handler sees for one dispatch. Built fresh per request.
pub struct Ctx<'a, 'w> {
    req: &'a Req,
    res: &'a mut Res<'w>,
    vars: Vars,
    data: collections::HashMap<String, Box<dyn Any + Send>>,
}

impl<'a, 'w> Ctx<'a, 'w> {
    pub fn new(req: &'a Req, res: &'a mut Res<'w>, vars: Vars) -> Self {
        Ctx {
            req,
            res,
            vars,
            data: collections::HashMap::new(),
        }
    }

    pub fn req(&self) -> &Req {
        self.req
    }

    pub fn res(&mut self) -> &mut Res<'w> {
        self.res
    }

    /// Path variable captured by `:name` in the matched pattern.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|v| v.as_str())
    }

    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    pub fn insert<T: Any + Send>(&mut self, key: &str, value: T) {
        self.data.insert(key.to_string(), Box::new(value));
    }

    pub fn get<T: Any + Send>(&self, key: &str) -> Option<&T> {
        self.data.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Any + Send>> {
        self.data.remove(key)
    }
}

/// Writes a 404 naming the requested path.
pub fn not_found(ctx: &mut Ctx) {
    let body = format!("404 page not found: {}\n", ctx.req().path());
    let res = ctx.res();
    res.set_status(404);
    res.set_header(HTTP_HEADER_CONTENT_TYPE, CONTENT_TYPE_TEXT_PLAIN);
    if let Err(e) = res.respond(body.as_bytes()) {
        error!("failed to write not found response: {}", e);
    }
}

/// Writes a bare 405.
pub fn method_not_allowed(ctx: &mut Ctx) {
    if let Err(e) = ctx.res().write_status(405) {
        error!("failed to write method not allowed response: {}", e);
    }
}
