/*!
 * Monitoring
 * Structured tracing setup and timed spans for arena workloads
 */

mod tracer;

pub use tracer::{init_tracing, span_workload, WorkloadSpan};
