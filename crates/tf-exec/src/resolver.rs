//! External resolution of remote-query implementations.

use tf_core::{FunctionDefinition, Value};

/// Deterministic mock result for `sparql`/`rest` implementations when no
/// context binding and no resolver are available.
pub const REMOTE_MOCK_VALUE: f64 = 100.0;

/// Resolves `sparql` and `rest` implementations against a real backend.
///
/// The core never performs network I/O itself; a host that wants live
/// remote queries registers one of these on the executor.
pub trait RemoteResolver {
    /// Resolve one invocation. `query` is the implementation argument
    /// (the SPARQL text or the method-and-URL string).
    fn resolve(
        &self,
        function: &FunctionDefinition,
        query: &str,
        inputs: &[Value],
    ) -> Result<Value, String>;
}
