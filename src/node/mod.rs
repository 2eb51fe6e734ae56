//! Node contract: declared sockets, typed values and the static registry.

pub mod registry;
pub mod schema;
pub mod value;

use crate::foundation::config::HostConfig;
use crate::foundation::error::NodeResult;

use self::schema::NodeSchema;
use self::value::{Inputs, NodeOutput};

/// One pluggable unit of work.
///
/// Implementations are stateless; all per-run data arrives through `inputs`.
pub trait Node: Send + Sync {
    fn schema(&self) -> NodeSchema;

    fn execute(&self, host: &HostConfig, inputs: &Inputs) -> NodeResult<NodeOutput>;
}
