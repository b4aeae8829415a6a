use k8s_openapi::serde_json::{json, to_value, Value};
use kube::api::{DynamicObject, ListParams};
use kube::core::GroupVersionKind;
use kube::config::KubeConfigOptions;
use kube::discovery::{pinned_kind, Discovery};
use kube::{Client, Config};
use serde_json_path::JsonPath;

use super::utils::{dynamic_api, resolve_api_resource};
use crate::completion::NameLister;
use crate::errors::CompletionError;
use crate::resources::argo_resource_for;

/// Lists names from the cluster of the selected kubeconfig context.
#[derive(Debug, Clone)]
pub struct KubeNameLister {
    context: Option<String>,
}

impl KubeNameLister {
    pub fn new(context: Option<String>) -> Self {
        Self { context }
    }

    fn kubeconfig_options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: self.context.clone(),
            cluster: None,
            user: None,
        }
    }

    /// Client plus the namespace of the active context.
    async fn client(&self) -> Result<(Client, String), CompletionError> {
        let config = Config::from_kubeconfig(&self.kubeconfig_options())
            .await
            .map_err(|e| CompletionError::Namespace(e.into()))?;
        let namespace = config.default_namespace.clone();
        Ok((Client::try_from(config)?, namespace))
    }
}

impl NameLister for KubeNameLister {
    #[tracing::instrument(skip(self))]
    async fn list_names(
        &self,
        kind: &str,
        namespace: Option<&str>,
        template: &str,
    ) -> Result<String, CompletionError> {
        let (client, default_ns) = self.client().await?;
        let namespace = namespace.unwrap_or(&default_ns);

        let (ar, caps) = match argo_resource_for(kind) {
            Some(ar) => {
                let gvk = GroupVersionKind::gvk(&ar.group, &ar.version, &ar.kind);
                pinned_kind(&client, &gvk).await?
            }
            None => {
                let discovery = Discovery::new(client.clone()).run().await?;
                resolve_api_resource(&discovery, kind)
                    .ok_or_else(|| CompletionError::UnknownKind(kind.to_string()))?
            }
        };

        let items = dynamic_api(&ar, &caps, client, Some(namespace))
            .list(&ListParams::default())
            .await?
            .items;
        project_names(&items, template)
    }
}

/// Applies a JSONPath template to a list document and joins the string
/// results with spaces.
fn project_names(items: &[DynamicObject], template: &str) -> Result<String, CompletionError> {
    let path = JsonPath::parse(template).map_err(|e| CompletionError::Template(e.to_string()))?;
    let doc = json!({ "items": to_value(items)? });
    let names: Vec<&str> = path
        .query(&doc)
        .all()
        .into_iter()
        .filter_map(Value::as_str)
        .collect();
    Ok(names.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::NAME_TEMPLATE;
    use k8s_openapi::serde_json::from_value;

    fn rollout(name: &str) -> DynamicObject {
        from_value(json!({
            "apiVersion": "argoproj.io/v1alpha1",
            "kind": "Rollout",
            "metadata": {"name": name, "namespace": "default"}
        }))
        .unwrap()
    }

    #[test]
    fn test_project_names() {
        let items = vec![rollout("guestbook"), rollout("canary-demo")];
        assert_eq!(
            project_names(&items, NAME_TEMPLATE).unwrap(),
            "guestbook canary-demo"
        );
        assert_eq!(project_names(&[], NAME_TEMPLATE).unwrap(), "");
    }

    #[test]
    fn test_lister_carries_context() {
        let lister = KubeNameLister::new(Some("staging".to_string()));
        assert!(format!("{lister:?}").contains("staging"));

        let options = lister.kubeconfig_options();
        assert_eq!(options.context.as_deref(), Some("staging"));
        assert!(options.cluster.is_none() && options.user.is_none());
    }

    #[test]
    fn test_invalid_template() {
        let err = project_names(&[rollout("guestbook")], "$.items[").unwrap_err();
        assert!(matches!(err, CompletionError::Template(_)));
    }
}
