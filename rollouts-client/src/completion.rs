//! Shell completion of resource names.
//!
//! Accepts either a bare name prefix (`gue`) or the `<type>/<name>` form
//! (`rollouts/gue`). Lookups are best effort: any failure yields no
//! candidates so the user's shell keeps working.

use std::future::Future;
use std::ops::{BitOr, BitOrAssign};

use tracing::debug;

use crate::errors::CompletionError;

/// JSONPath projecting the names out of a list response.
pub const NAME_TEMPLATE: &str = "$.items[*].metadata.name";

/// Lists resource names of a kind as a space separated string.
pub trait NameLister {
    fn list_names(
        &self,
        kind: &str,
        namespace: Option<&str>,
        template: &str,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

/// Cobra compatible completion directive bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShellCompDirective(u8);

impl ShellCompDirective {
    pub const ERROR: Self = Self(1);
    pub const NO_SPACE: Self = Self(2);
    pub const NO_FILE_COMP: Self = Self(4);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ShellCompDirective {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ShellCompDirective {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completions {
    pub candidates: Vec<String>,
    pub directive: ShellCompDirective,
}

/// Resource types offered for the `<type>/` form when completing a kind.
fn type_choices(kind: &str) -> &'static [&'static str] {
    match kind {
        "rollout" | "rollouts" => &["rollouts"],
        "experiment" | "experiments" => &["experiments"],
        _ => &[],
    }
}

pub struct NameCompleter<L> {
    lister: L,
    namespace: Option<String>,
}

impl<L: NameLister> NameCompleter<L> {
    /// `namespace` of `None` lets the lister use the active namespace.
    pub fn new(lister: L, namespace: Option<String>) -> Self {
        Self { lister, namespace }
    }

    #[tracing::instrument(skip(self))]
    pub async fn complete(&self, to_complete: &str, resource_kind: &str) -> Completions {
        let mut directive = ShellCompDirective::NO_FILE_COMP;

        let candidates = match to_complete.split_once('/') {
            None => {
                let mut comps = self.names_with_prefix(resource_kind, to_complete).await;
                if comps.is_empty() {
                    // only `<type>/` left to offer, more typing follows the slash
                    directive |= ShellCompDirective::NO_SPACE;
                }
                comps.extend(
                    type_choices(resource_kind)
                        .iter()
                        .filter(|choice| choice.starts_with(to_complete))
                        .map(|choice| format!("{choice}/")),
                );
                comps
            }
            Some((resource_type, name)) => self
                .names_with_prefix(resource_type, name)
                .await
                .into_iter()
                .map(|c| format!("{resource_type}/{c}"))
                .collect(),
        };

        Completions {
            candidates,
            directive,
        }
    }

    async fn names_with_prefix(&self, kind: &str, prefix: &str) -> Vec<String> {
        match self
            .lister
            .list_names(kind, self.namespace.as_deref(), NAME_TEMPLATE)
            .await
        {
            Ok(names) => names
                .split(' ')
                .filter(|name| !name.is_empty() && name.starts_with(prefix))
                .map(str::to_string)
                .collect(),
            Err(err) => {
                debug!(error = %err, kind, "completion lookup failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeLister {
        names: HashMap<&'static str, &'static str>,
    }

    impl FakeLister {
        fn new(names: &[(&'static str, &'static str)]) -> Self {
            Self {
                names: names.iter().copied().collect(),
            }
        }
    }

    impl NameLister for FakeLister {
        async fn list_names(
            &self,
            kind: &str,
            _namespace: Option<&str>,
            template: &str,
        ) -> Result<String, CompletionError> {
            assert_eq!(template, NAME_TEMPLATE);
            self.names
                .get(kind)
                .map(|names| names.to_string())
                .ok_or_else(|| CompletionError::UnknownKind(kind.to_string()))
        }
    }

    struct NoNamespace;

    impl NameLister for NoNamespace {
        async fn list_names(
            &self,
            _kind: &str,
            _namespace: Option<&str>,
            _template: &str,
        ) -> Result<String, CompletionError> {
            Err(CompletionError::Namespace("no current context".into()))
        }
    }

    fn cluster() -> NameCompleter<FakeLister> {
        NameCompleter::new(
            FakeLister::new(&[
                ("rollout", "guestbook guestbook-canary canary-demo "),
                ("rollouts", "guestbook guestbook-canary canary-demo "),
                ("experiment", "exp-1 "),
            ]),
            Some("default".to_string()),
        )
    }

    #[tokio::test]
    async fn test_type_prefix_without_names() {
        let comps = cluster().complete("roll", "rollout").await;

        assert_eq!(comps.candidates, vec!["rollouts/"]);
        assert!(comps.directive.contains(ShellCompDirective::NO_SPACE));
        assert!(comps.directive.contains(ShellCompDirective::NO_FILE_COMP));
    }

    #[tokio::test]
    async fn test_bare_name_prefix() {
        let comps = cluster().complete("gue", "rollout").await;

        assert_eq!(comps.candidates, vec!["guestbook", "guestbook-canary"]);
        assert_eq!(comps.directive, ShellCompDirective::NO_FILE_COMP);
    }

    #[tokio::test]
    async fn test_empty_input_lists_names_and_types() {
        let comps = cluster().complete("", "rollout").await;

        assert_eq!(
            comps.candidates,
            vec!["guestbook", "guestbook-canary", "canary-demo", "rollouts/"]
        );
        assert!(!comps.directive.contains(ShellCompDirective::NO_SPACE));
    }

    #[tokio::test]
    async fn test_type_slash_name() {
        let comps = cluster().complete("rollouts/gue", "rollout").await;

        assert_eq!(
            comps.candidates,
            vec!["rollouts/guestbook", "rollouts/guestbook-canary"]
        );
        assert_eq!(comps.directive, ShellCompDirective::NO_FILE_COMP);
    }

    #[tokio::test]
    async fn test_unknown_type_yields_nothing() {
        let comps = cluster().complete("widgets/gue", "rollout").await;
        assert!(comps.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_lister_error_degrades_to_empty() {
        let completer = NameCompleter::new(NoNamespace, None);

        let comps = completer.complete("gue", "rollout").await;
        assert!(comps.candidates.is_empty());

        let comps = completer.complete("ro", "rollout").await;
        assert_eq!(comps.candidates, vec!["rollouts/"]);
    }

    #[test]
    fn test_directive_bits() {
        let directive = ShellCompDirective::NO_FILE_COMP | ShellCompDirective::NO_SPACE;
        assert_eq!(directive.bits(), 6);
        assert!(!directive.contains(ShellCompDirective::ERROR));
    }
}
