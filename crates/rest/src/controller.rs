use axum::{routing::MethodRouter, Router};
use blockgate_core::ChainClient;
use serde::Serialize;

use crate::{guard::guard, Facade};

pub type Routes<S> = Vec<(&'static str, MethodRouter<S>)>;

/// A group of routes sharing a base path.
pub trait Controller<C: ChainClient>: Send + Sync {
    fn base_path(&self) -> &'static str;

    /// `(suffix, handler)` pairs, mounted at `base_path() + suffix`.
    fn routes(&self) -> Routes<Facade<C>>;
}

fn full_path(base: &str, suffix: &str) -> String {
    match (base, suffix) {
        ("", "") => "/".to_string(),
        (base, suffix) => format!("{base}{suffix}"),
    }
}

/// Every path mounted by a set of controllers, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    paths: Vec<String>,
}

impl RouteTable {
    pub fn of<C: ChainClient>(controllers: &[&dyn Controller<C>]) -> Self {
        let paths = controllers
            .iter()
            .flat_map(|c| {
                let base = c.base_path();
                c.routes()
                    .into_iter()
                    .map(move |(suffix, _)| full_path(base, suffix))
            })
            .collect();

        Self { paths }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

/// Mounts every route of `controller` on `router`, each behind the panic
/// guard.
pub fn register<C: ChainClient>(
    router: Router<Facade<C>>,
    controller: &dyn Controller<C>,
) -> Router<Facade<C>> {
    let base = controller.base_path();

    controller
        .routes()
        .into_iter()
        .fold(router, |router, (suffix, handler)| {
            router.route(&full_path(base, suffix), guard(handler))
        })
}

pub fn mount<C: ChainClient>(controllers: &[&dyn Controller<C>]) -> Router<Facade<C>> {
    controllers
        .iter()
        .fold(Router::new(), |router, controller| register(router, *controller))
}
