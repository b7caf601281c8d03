pub mod audit_sink;

pub use self::audit_sink::{AuditSink, AuditSinkError};
