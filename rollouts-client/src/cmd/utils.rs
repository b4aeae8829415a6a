use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, ApiResource, DynamicObject, ListParams};
use kube::discovery::{ApiCapabilities, Discovery, Scope};
use kube::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

pub fn resolve_api_resource(
    discovery: &Discovery,
    name: &str,
) -> Option<(ApiResource, ApiCapabilities)> {
    // prefer the recommended version, ties broken by group name
    discovery
        .groups()
        .flat_map(|group| {
            group
                .resources_by_stability()
                .into_iter()
                .map(move |res| (group, res))
        })
        .filter(|(_, (res, _))| {
            name.eq_ignore_ascii_case(&res.kind) || name.eq_ignore_ascii_case(&res.plural)
        })
        .min_by_key(|(group, _)| group.name())
        .map(|(_, res)| res)
}

pub fn dynamic_api(
    ar: &ApiResource,
    caps: &ApiCapabilities,
    client: Client,
    ns: Option<&str>,
) -> Api<DynamicObject> {
    if caps.scope == Scope::Cluster {
        Api::all_with(client, ar)
    } else if let Some(namespace) = ns {
        Api::namespaced_with(client, namespace, ar)
    } else {
        Api::default_namespaced_with(client, ar)
    }
}

/// Lists a kind, treating a missing resource type as empty. Argo kinds that
/// are not installed in the cluster then simply contribute no children.
pub async fn list_or_empty<K>(api: &Api<K>) -> Result<Vec<K>, kube::Error>
where
    K: Clone + DeserializeOwned + Debug,
{
    match api.list(&ListParams::default()).await {
        Ok(list) => Ok(list.items),
        Err(kube::Error::Api(resp)) if resp.code == 404 => {
            debug!(reason = %resp.reason, "resource type not served, skipping");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

/// Namespaced typed api, or the client's default namespace.
pub fn namespaced<K>(client: Client, ns: Option<&str>) -> Api<K>
where
    K: kube::Resource<Scope = NamespaceResourceScope>,
    <K as kube::Resource>::DynamicType: Default,
{
    match ns {
        Some(namespace) => Api::namespaced(client, namespace),
        None => Api::default_namespaced(client),
    }
}
