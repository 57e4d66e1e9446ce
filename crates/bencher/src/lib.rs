#[derive(Debug, Copy, Clone)]
pub struct PatternCase {
    name: &'static str,
    path: &'static str,
    request_path: &'static str,
}

impl PatternCase {
    pub const fn new(name: &'static str, path: &'static str, request_path: &'static str) -> Self {
        Self { name, path, request_path }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The route path, placeholders included.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// A request path the route path matches.
    pub fn request_path(&self) -> &'static str {
        self.request_path
    }
}
