//! typed operation helper
//!
//! operation trait for documents known at compile time.

use serde::de::DeserializeOwned;

/// graphql operation contract for statically known documents
pub trait Operation {
    /// graphql query or mutation string
    const QUERY: &'static str;
    /// operation to select when the document holds several
    const OPERATION_NAME: Option<&'static str> = None;
    /// response payload type
    type Response: DeserializeOwned;
}
