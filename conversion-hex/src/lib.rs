//! # Conversion Hex
//!
//! Application service layer and HTTP adapter for the currency conversion
//! service.
//!
//! ## Architecture
//!
//! - `service/` - Conversion service (validation, rate lookup, rounding)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - OpenAPI document served by the adapter
//!
//! The service is generic over `P: RateProvider`, so the upstream client is
//! constructed once by the binary and injected here.

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::ConversionService;
