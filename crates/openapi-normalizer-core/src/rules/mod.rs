//! Normalization rule catalog.
//!
//! Each rule is a self-contained transformation implementing [`crate::Rule`].
//! Rules compose through [`crate::Pipeline`], which feeds each rule's output
//! document into the next.

pub mod binary_type;
pub mod collapse_single_of;
pub mod default_produces;
pub mod format_to_type;
pub mod hoist_parameters;
pub mod html_content;
pub mod nullable;
pub mod path_servers;
pub mod prune_empty_branches;
pub mod query_paths;
pub mod response_headers;

pub use binary_type::BinaryTypeToFile;
pub use collapse_single_of::CollapseSingleOf;
pub use default_produces::RemoveDefaultOnlyProduces;
pub use format_to_type::FormatToType;
pub use hoist_parameters::HoistPathParameters;
pub use html_content::RemoveHtmlContent;
pub use nullable::NullableToTypeNull;
pub use path_servers::RemovePathsWithServers;
pub use prune_empty_branches::PruneEmptyArrayBranches;
pub use query_paths::MoveQueryPaths;
pub use response_headers::RemoveResponseHeaders;
