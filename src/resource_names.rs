//! Typed resource names for the service's collection hierarchy.
//!
//! Every resource name follows a fixed segment template rooted at
//! `projects/{project}/locations/{location}`. The generated types format a
//! name from its segments and parse one back, rejecting strings that do not
//! fit the template.
//!
//! ```ignore
//! use aiplatform::ModelName;
//!
//! let name = ModelName::new("my-project", "us-central1", "my-model");
//! assert_eq!(name.to_string(), "projects/my-project/locations/us-central1/models/my-model");
//! let parsed: ModelName = name.to_string().parse()?;
//! assert_eq!(parsed.model(), "my-model");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Generates a resource-name type from an alternating list of literal
/// collection segments and named variables.
macro_rules! resource_name {
    ($name:ident, $doc:expr, [$($literal:literal / $field:ident),+ $(,)?]) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            $($field: String,)+
        }

        impl $name {
            pub fn new($($field: impl Into<String>),+) -> Self {
                Self {
                    $($field: $field.into(),)+
                }
            }

            $(
                #[doc = concat!("The `", stringify!($field), "` segment.")]
                pub fn $field(&self) -> &str {
                    &self.$field
                }
            )+

            /// Segment template this type formats and parses.
            pub const fn template() -> &'static str {
                concat!($($literal, "/{", stringify!($field), "}/",)+)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut first = true;
                $(
                    if !first {
                        f.write_str("/")?;
                    }
                    first = false;
                    let _ = first;
                    write!(f, "{}/{}", $literal, self.$field)?;
                )+
                Ok(())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(value: &str) -> Result<Self, Error> {
                let mut segments = value.split('/');
                $(
                    let $field = match (segments.next(), segments.next()) {
                        (Some($literal), Some(id)) if !id.is_empty() => id.to_string(),
                        _ => {
                            return Err(Error::config(format!(
                                concat!(
                                    "resource name {:?} does not match ",
                                    stringify!($name),
                                    " template {:?}"
                                ),
                                value,
                                Self::template(),
                            )))
                        }
                    };
                )+
                if segments.next().is_some() {
                    return Err(Error::config(format!(
                        concat!(
                            "resource name {:?} has trailing segments beyond the ",
                            stringify!($name),
                            " template"
                        ),
                        value,
                    )));
                }
                Ok(Self {
                    $($field,)+
                })
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> String {
                name.to_string()
            }
        }
    };
}

resource_name!(
    LocationName,
    "A location under a project, the parent of most collections.",
    ["projects" / project, "locations" / location]
);

resource_name!(
    EndpointName,
    "A serving endpoint, `projects/{p}/locations/{l}/endpoints/{e}`.",
    ["projects" / project, "locations" / location, "endpoints" / endpoint]
);

resource_name!(
    ModelName,
    "An uploaded model, `projects/{p}/locations/{l}/models/{m}`.",
    ["projects" / project, "locations" / location, "models" / model]
);

resource_name!(
    EvaluationName,
    "A model evaluation, `.../models/{m}/evaluations/{ev}`.",
    [
        "projects" / project,
        "locations" / location,
        "models" / model,
        "evaluations" / evaluation
    ]
);

resource_name!(
    SliceName,
    "An evaluation slice, `.../evaluations/{ev}/slices/{s}`.",
    [
        "projects" / project,
        "locations" / location,
        "models" / model,
        "evaluations" / evaluation,
        "slices" / slice
    ]
);

resource_name!(
    TrainingPipelineName,
    "A training pipeline, `projects/{p}/locations/{l}/trainingPipelines/{tp}`.",
    [
        "projects" / project,
        "locations" / location,
        "trainingPipelines" / training_pipeline
    ]
);

resource_name!(
    DeploymentResourcePoolName,
    "A deployment resource pool, `.../deploymentResourcePools/{pool}`.",
    [
        "projects" / project,
        "locations" / location,
        "deploymentResourcePools" / deployment_resource_pool
    ]
);

resource_name!(
    PublisherModelName,
    "A Model Garden catalog entry, `publishers/{publisher}/models/{m}`.",
    ["publishers" / publisher, "models" / model]
);

resource_name!(
    BillingAccountName,
    "Common billing-account ancestor, `billingAccounts/{ba}`.",
    ["billingAccounts" / billing_account]
);

resource_name!(
    FolderName,
    "Common folder ancestor, `folders/{f}`.",
    ["folders" / folder]
);

resource_name!(
    OrganizationName,
    "Common organization ancestor, `organizations/{o}`.",
    ["organizations" / organization]
);

resource_name!(
    ProjectName,
    "Common project ancestor, `projects/{p}`.",
    ["projects" / project]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_name_round_trips() {
        let name = ModelName::new("p", "us-central1", "m");
        assert_eq!(name.to_string(), "projects/p/locations/us-central1/models/m");

        let parsed: ModelName = name.to_string().parse().unwrap();
        assert_eq!(parsed, name);
        assert_eq!(parsed.project(), "p");
        assert_eq!(parsed.location(), "us-central1");
        assert_eq!(parsed.model(), "m");
    }

    #[test]
    fn slice_name_walks_the_full_hierarchy() {
        let name: SliceName = "projects/p/locations/l/models/m/evaluations/e/slices/s"
            .parse()
            .unwrap();
        assert_eq!(name.evaluation(), "e");
        assert_eq!(name.slice(), "s");
    }

    #[test]
    fn wrong_collections_are_rejected() {
        assert!("projects/p/locations/l/endpoints/e"
            .parse::<ModelName>()
            .is_err());
        assert!("projects/p/locations/l".parse::<ModelName>().is_err());
        assert!("projects/p/locations/l/models/m/evaluations/e"
            .parse::<ModelName>()
            .is_err());
        assert!("projects/p/locations/l/models/".parse::<ModelName>().is_err());
    }

    #[test]
    fn common_ancestors_parse() {
        let billing: BillingAccountName = "billingAccounts/123".parse().unwrap();
        assert_eq!(billing.billing_account(), "123");
        assert!("billingAccounts".parse::<BillingAccountName>().is_err());

        let org: OrganizationName = "organizations/acme".parse().unwrap();
        assert_eq!(org.to_string(), "organizations/acme");
    }

    #[test]
    fn publisher_models_live_outside_projects() {
        let name: PublisherModelName = "publishers/google/models/gemini".parse().unwrap();
        assert_eq!(name.publisher(), "google");
        assert_eq!(name.model(), "gemini");
    }
}
