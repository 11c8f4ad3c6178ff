//! Route table assembly.
//!
//! # Responsibilities
//! - Partition the manifest into proxy rules and static mounts
//! - Keep caller-supplied overrides ahead of manifest-derived rules
//! - Skip unresolvable routes without failing the start

use std::path::PathBuf;

use crate::config::schema::ServeOptions;
use crate::manifest::schema::Manifest;
use crate::routing::credentials::CredentialSnapshot;
use crate::routing::resolver::{self, ProxyRule};

/// Startup-time partition of the manifest. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Proxy rules in match order: overrides first, then manifest rules.
    pub proxies: Vec<ProxyRule>,

    /// Static roots in mount order: base root, caller extras, then
    /// application roots from the manifest.
    pub mounts: Vec<PathBuf>,
}

impl RouteTable {
    /// Resolve every manifest route against the options and credential
    /// snapshot. Duplicate contexts are kept; no dedup.
    pub fn build(
        manifest: &Manifest,
        options: &ServeOptions,
        credentials: &CredentialSnapshot,
    ) -> Self {
        let mut proxies = options.proxies.clone();
        let mut mounts = vec![options.static_root()];
        mounts.extend(options.local_resources.iter().cloned());

        for route in &manifest.routes {
            if route.path.is_empty() || !route.path.starts_with('/') {
                tracing::warn!(path = %route.path, "route path must start with '/', skipping");
                continue;
            }

            if let Some(rule) = resolver::resolve_proxy(route, options, credentials) {
                proxies.push(rule);
            }
            if let Some(path) = resolver::resolve_path(route, credentials) {
                mounts.push(path);
            }
        }

        Self { proxies, mounts }
    }

    /// First rule whose context prefixes the request path.
    pub fn matching(&self, path: &str) -> Option<&ProxyRule> {
        self.proxies.iter().find(|rule| rule.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::schema::{RouteDescriptor, RouteTarget};
    use std::collections::HashMap;

    fn manifest_with(routes: Vec<RouteDescriptor>) -> Manifest {
        Manifest { routes }
    }

    fn snapshot(pairs: &[(&str, &str)]) -> CredentialSnapshot {
        CredentialSnapshot::from_vars(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    fn override_rule(context: &str, host: &str) -> ProxyRule {
        ProxyRule {
            context: context.to_owned(),
            host: host.to_owned(),
            port: None,
            https: false,
            headers: HashMap::new(),
            rewrite: HashMap::new(),
        }
    }

    fn ui5_route(path: &str) -> RouteDescriptor {
        RouteDescriptor {
            path: path.to_owned(),
            target: RouteTarget::Service {
                name: "sapui5".to_owned(),
                entry_path: Some("/resources".to_owned()),
            },
        }
    }

    #[test]
    fn overrides_precede_manifest_rules() {
        let options = ServeOptions {
            proxies: vec![override_rule("/ui5", "override.example.com")],
            ..ServeOptions::default()
        };
        let manifest = manifest_with(vec![ui5_route("/ui5")]);

        let table = RouteTable::build(&manifest, &options, &CredentialSnapshot::default());
        assert_eq!(table.proxies.len(), 2);
        assert_eq!(table.proxies[0].host, "override.example.com");
        assert_eq!(table.proxies[1].host, "sapui5.hana.ondemand.com");

        // First match wins, so the override answers for its context.
        assert_eq!(table.matching("/ui5/x").unwrap().host, "override.example.com");
    }

    #[test]
    fn duplicate_contexts_coexist_and_the_earlier_one_wins() {
        let manifest = manifest_with(vec![ui5_route("/ui5"), ui5_route("/ui5")]);
        let options = ServeOptions::default();

        let table = RouteTable::build(&manifest, &options, &CredentialSnapshot::default());
        assert_eq!(table.proxies.len(), 2);
        assert!(std::ptr::eq(
            table.matching("/ui5").unwrap(),
            &table.proxies[0]
        ));
    }

    #[test]
    fn unresolvable_routes_are_dropped_silently() {
        let manifest = manifest_with(vec![RouteDescriptor {
            path: "/api".to_owned(),
            target: RouteTarget::Destination {
                name: "BACKEND".to_owned(),
                entry_path: None,
            },
        }]);

        let table = RouteTable::build(
            &manifest,
            &ServeOptions::default(),
            &CredentialSnapshot::default(),
        );
        assert!(table.proxies.is_empty());
    }

    #[test]
    fn invalid_route_paths_are_skipped() {
        let manifest = manifest_with(vec![
            RouteDescriptor {
                path: "no-slash".to_owned(),
                target: RouteTarget::Service {
                    name: "sapui5".to_owned(),
                    entry_path: None,
                },
            },
            ui5_route("/ui5"),
        ]);

        let table = RouteTable::build(
            &manifest,
            &ServeOptions::default(),
            &CredentialSnapshot::default(),
        );
        assert_eq!(table.proxies.len(), 1);
        assert_eq!(table.proxies[0].context, "/ui5");
    }

    #[test]
    fn mounts_keep_declared_order() {
        let options = ServeOptions {
            local_resources: vec![PathBuf::from("../shared/webapp")],
            ..ServeOptions::default()
        };
        let manifest = manifest_with(vec![RouteDescriptor {
            path: "/shell".to_owned(),
            target: RouteTarget::Application {
                name: "SHELL".to_owned(),
                entry_path: None,
            },
        }]);
        let snapshot = snapshot(&[("DEST_SHELL_PATH", "../shell/webapp")]);

        let table = RouteTable::build(&manifest, &options, &snapshot);
        assert_eq!(
            table.mounts,
            vec![
                PathBuf::from("./webapp"),
                PathBuf::from("../shared/webapp"),
                PathBuf::from("../shell/webapp"),
            ]
        );
    }

    #[test]
    fn no_match_is_explicit() {
        let table = RouteTable::default();
        assert!(table.matching("/anything").is_none());
    }
}
