// ABOUTME: npm registry integration for package metadata, catalogs and install hints

pub mod catalog;
pub mod client;
pub mod hint;

pub use catalog::Catalog;
pub use client::{NpmRegistry, PackageDetails, RegistryError};
