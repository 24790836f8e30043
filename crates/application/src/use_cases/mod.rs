//! Application use cases (business logic orchestration).

mod publish_global_variables;

pub use publish_global_variables::{
    GlobalVariablesPublisher, LOG_PREFIX, merge_variables, resolve_and_merge, resolve_variables,
};
