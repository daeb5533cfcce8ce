//! Request middleware applied before forwarding.

pub mod include;

pub use include::{
    include_middleware, inject, IncludeInterceptor, IncludeOutcome, INCLUDE_FLAG_PARAM,
    INCLUDE_PARAM,
};
