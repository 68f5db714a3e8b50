//! The console's static route table.
//!
//! Each endpoint group lives under a configurable prefix; the paths below
//! are appended to it. Within a group, literal routes come before parameter
//! routes so that first-match lookup prefers them.

use axum::http::Method;

use crate::config::WebServerConfig;
use crate::pipeline::PipelineKind;

/// One registered route: method + full path pattern → pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub method: Method,
    pub pattern: String,
    pub pipeline: PipelineKind,
}

type Group = &'static [(Method, &'static str)];

const MAINTAIN: &[(Method, &str, PipelineKind)] = &[
    (Method::POST, "/mainuser/create", PipelineKind::Bootstrap),
    (Method::GET, "/mainuser/exist", PipelineKind::MainUser),
    (Method::GET, "/server/functions", PipelineKind::Server),
];

const MONITOR: Group = &[
    (Method::GET, "/query_range"),
    (Method::GET, "/label/:resource/values"),
];

const NAMESPACES: Group = &[
    (Method::POST, "/namespaces"),
    (Method::GET, "/namespaces"),
    (Method::PUT, "/namespaces"),
    (Method::POST, "/namespaces/delete"),
];

const AUTH: Group = &[
    (Method::POST, "/user/login"),
    (Method::GET, "/users"),
    (Method::POST, "/users"),
    (Method::POST, "/users/delete"),
    (Method::PUT, "/users"),
    (Method::PUT, "/user/password"),
    (Method::GET, "/user/token"),
    (Method::PUT, "/user/token/enable"),
    (Method::PUT, "/user/token/refresh"),
    (Method::POST, "/usergroup"),
    (Method::PUT, "/usergroups"),
    (Method::GET, "/usergroups"),
    (Method::POST, "/usergroups/delete"),
    (Method::GET, "/usergroup/detail"),
    (Method::GET, "/usergroup/token"),
    (Method::PUT, "/usergroup/token/enable"),
    (Method::PUT, "/usergroup/token/refresh"),
    (Method::POST, "/policies"),
    (Method::GET, "/policy/detail"),
    (Method::PUT, "/policies"),
    (Method::POST, "/policies/delete"),
    (Method::GET, "/policies"),
    (Method::GET, "/principal/resources"),
    (Method::POST, "/roles"),
    (Method::PUT, "/roles"),
    (Method::POST, "/roles/delete"),
    (Method::GET, "/roles"),
    (Method::GET, "/system"),
    (Method::GET, "/status"),
];

const NAMING_V1: Group = &[
    (Method::POST, "/namespaces"),
    (Method::POST, "/services"),
    (Method::POST, "/service/alias"),
    (Method::POST, "/instances"),
    (Method::POST, "/routings"),
    (Method::POST, "/ratelimits"),
    (Method::POST, "/circuitbreakers"),
    (Method::POST, "/circuitbreakers/version"),
    (Method::POST, "/circuitbreakers/release"),
    (Method::POST, "/circuitbreaker/rules"),
    (Method::POST, "/faultdetectors"),
    (Method::POST, "/namespaces/delete"),
    (Method::POST, "/services/delete"),
    (Method::POST, "/service/aliases/delete"),
    (Method::POST, "/instances/delete"),
    (Method::POST, "/routings/delete"),
    (Method::POST, "/ratelimits/delete"),
    (Method::POST, "/circuitbreaker/rules/delete"),
    (Method::POST, "/faultdetectors/delete"),
    (Method::POST, "/service/contracts/delete"),
    (Method::POST, "/service/contract/methods"),
    (Method::POST, "/service/contract/methods/delete"),
    (Method::GET, "/:resource"),
    (Method::GET, "/:resource/count"),
    (Method::GET, "/:resource/aliases"),
    (Method::GET, "/:resource/token"),
    (Method::GET, "/:resource/labels"),
    (Method::GET, "/:resource/rules"),
    (Method::GET, "/:resource/all"),
    (Method::GET, "/:resource/contract/versions"),
    (Method::GET, "/:resource/contracts"),
    (Method::PUT, "/:resource"),
    (Method::PUT, "/:resource/token"),
    (Method::PUT, "/:resource/alias"),
    (Method::PUT, "/:resource/enable"),
    (Method::PUT, "/:resource/rules"),
    (Method::PUT, "/:resource/rules/enable"),
];

const CONFIG: Group = &[
    (Method::POST, "/groups"),
    (Method::PUT, "/groups"),
    (Method::POST, "/groups/delete"),
    (Method::GET, "/groups"),
    (Method::POST, "/files"),
    (Method::PUT, "/files"),
    (Method::POST, "/files/delete"),
    (Method::GET, "/files/detail"),
    (Method::GET, "/files/search"),
    (Method::POST, "/files/export"),
    (Method::POST, "/files/import"),
    (Method::GET, "/files/encrypt/algorithms"),
    (Method::POST, "/files/release"),
    (Method::GET, "/files/release"),
    (Method::GET, "/files/releases"),
    (Method::PUT, "/files/releases/rollback"),
    (Method::POST, "/files/releases/delete"),
    (Method::GET, "/files/release/versions"),
    (Method::POST, "/files/releases/stopbeta"),
    (Method::GET, "/files/releasehistory"),
    (Method::GET, "/configfiletemplates"),
];

/// Join a group prefix and a route path with exactly one `/` between them.
fn join(prefix: &str, path: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// The full console route table for the configured prefixes.
pub fn console_routes(web: &WebServerConfig) -> Vec<RouteEntry> {
    let mut entries = Vec::new();

    for (method, path, pipeline) in MAINTAIN {
        entries.push(RouteEntry {
            method: method.clone(),
            pattern: join(&web.maintain_url, path),
            pipeline: *pipeline,
        });
    }

    let groups: [(&str, Group, PipelineKind); 5] = [
        (&web.monitor_url, MONITOR, PipelineKind::Monitor),
        (&web.core_url, NAMESPACES, PipelineKind::Server),
        (&web.auth_url, AUTH, PipelineKind::Server),
        (&web.naming_v1_url, NAMING_V1, PipelineKind::Server),
        (&web.config_url, CONFIG, PipelineKind::Server),
    ];
    for (prefix, routes, pipeline) in groups {
        for (method, path) in routes {
            entries.push(RouteEntry {
                method: method.clone(),
                pattern: join(prefix, path),
                pipeline,
            });
        }
    }

    entries
}
