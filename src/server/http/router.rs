use {
    std::sync,
    super::{
        ctx::{self, Ctx},
        error::RouteError,
        matcher::{Pattern, Vars},
        method::Method,
        req::Req,
        res::Res,
    },
    crate::logger::micro::*,
};

pub type Handler = dyn Fn(&mut Ctx) + Send + Sync + 'static;
pub type HandlerRef = sync::Arc<Handler>;

pub struct Route {
    method: Method,
    pattern: Pattern,
    handler: HandlerRef,
}

impl Route {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// Result of resolving a method and path against the registered routes.
pub enum Lookup<'r> {
    Found(&'r Route, Vars),
    MethodNotAllowed,
    NotFound,
}

/// Routes requests by method and path, in registration order.
///
/// Routes are only added through `&mut self`, so once a router is shared with
/// the worker lines it is read-only and dispatch needs no locking.
pub struct Router {
    routes: Vec<Route>,
    not_found: HandlerRef,
    method_not_allowed: HandlerRef,
}

impl Default for Router {
    fn default() -> Self {
        Router {
            routes: Vec::new(),
            not_found: sync::Arc::new(ctx::not_found),
            method_not_allowed: sync::Arc::new(ctx::method_not_allowed),
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_not_found(h: impl Fn(&mut Ctx) + Send + Sync + 'static) -> Self {
        Router {
            not_found: sync::Arc::new(h),
            ..Self::default()
        }
    }

    pub fn with_method_not_allowed(mut self, h: impl Fn(&mut Ctx) + Send + Sync + 'static) -> Self {
        self.method_not_allowed = sync::Arc::new(h);
        self
    }

    pub fn register(&mut self, m: Method, p: &str, h: impl Fn(&mut Ctx) + Send + Sync + 'static) -> Result<(), RouteError> {
        if m == Method::UNKNOWN {
            return Err(RouteError::UnsupportedMethod(m));
        }
        let pattern = Pattern::parse(p)?;
        if self.routes.iter().any(|r| r.method == m && r.pattern == pattern) {
            warn!("route {} {} is already registered; the earlier one shadows it", m, p);
        }
        debug!("route registered: {} {}", m, p);
        self.routes.push(Route {
            method: m,
            pattern,
            handler: sync::Arc::new(h),
        });
        Ok(())
    }

    pub fn get(&mut self, p: &str, h: impl Fn(&mut Ctx) + Send + Sync + 'static) -> Result<(), RouteError> {
        self.register(Method::GET, p, h)
    }

    pub fn head(&mut self, p: &str, h: impl Fn(&mut Ctx) + Send + Sync + 'static) -> Result<(), RouteError> {
        self.register(Method::HEAD, p, h)
    }

    pub fn post(&mut self, p: &str, h: impl Fn(&mut Ctx) + Send + Sync + 'static) -> Result<(), RouteError> {
        self.register(Method::POST, p, h)
    }

    pub fn put(&mut self, p: &str, h: impl Fn(&mut Ctx) + Send + Sync + 'static) -> Result<(), RouteError> {
        self.register(Method::PUT, p, h)
    }

    pub fn patch(&mut self, p: &str, h: impl Fn(&mut Ctx) + Send + Sync + 'static) -> Result<(), RouteError> {
        self.register(Method::PATCH, p, h)
    }

    pub fn delete(&mut self, p: &str, h: impl Fn(&mut Ctx) + Send + Sync + 'static) -> Result<(), RouteError> {
        self.register(Method::DELETE, p, h)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// The first route whose pattern matches and whose method serves `m` wins.
    /// A matching path under another method is remembered but scanning goes on,
    /// since a later route may still accept the method.
    pub fn lookup(&self, m: Method, path: &str) -> Lookup<'_> {
        let mut path_matched = false;
        for route in self.routes.iter() {
            let vars = match route.pattern.matches(path) {
                Some(vars) => vars,
                None => continue,
            };
            if route.method.serves(m) {
                return Lookup::Found(route, vars);
            }
            path_matched = true;
        }
        if path_matched {
            Lookup::MethodNotAllowed
        } else {
            Lookup::NotFound
        }
    }

    /// Invokes exactly one handler for the request: the matched route's, the
    /// method-not-allowed one, or the not-found one.
    pub fn serve(&self, req: &Req, res: &mut Res) {
        let (handler, vars) = match self.lookup(*req.method(), req.path()) {
            Lookup::Found(route, vars) => {
                trace!("{} {} matched {} {}", req.method(), req.path(), route.method, route.pattern.as_str());
                (&route.handler, vars)
            },
            Lookup::MethodNotAllowed => {
                debug!("{} {} method not allowed", req.method(), req.path());
                (&self.method_not_allowed, Vars::new())
            },
            Lookup::NotFound => {
                debug!("{} {} not found", req.method(), req.path());
                (&self.not_found, Vars::new())
            },
        };
        let mut ctx = Ctx::new(req, res, vars);
        handler(&mut ctx);
    }
}
