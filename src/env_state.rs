//! # Sossim environment state
//!
//! This module defines [`crate::env_state::SossimEnv`], the **shared environment object** used
//! across the `sossim` library. It provides access to a persistent **HTTP client** used for
//! star-catalog cone searches.
//!
//! This object is designed to be **cheaply cloneable** and passed to components
//! that require access to external data sources.
//!
//! ## Overview
//!
//! The main responsibilities of `SossimEnv` are:
//!
//! 1. Manage a global [`ureq::Agent`] HTTP client with sensible default settings.
//! 2. Provide simple utilities for performing HTTP GET requests.
//!
//! ## Notes
//!
//! - The [`crate::env_state::SossimEnv`] struct is meant to be reused and shared between
//!   different parts of the crate to avoid redundant HTTP session creation.
use std::convert::TryFrom;
use std::{fmt::Debug, time::Duration};
use ureq::{
    http::{self, Uri},
    Agent,
};

use crate::sossim_errors::SossimError;

/// This object is passed to the various functions in the library
/// to provide access to the state of the library
///
/// # Fields
///
/// * `http_client` - A ureq agent used to make HTTP requests
#[derive(Debug, Clone)]
pub struct SossimEnv {
    pub http_client: Agent,
}

impl Default for SossimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl SossimEnv {
    /// Create a new environment object
    ///
    /// Return
    /// ------
    /// * A new SossimEnv object with an HTTP client created with default settings
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();
        let agent: Agent = config.into();

        SossimEnv { http_client: agent }
    }

    /// Perform an HTTP GET request and return the response body as a string.
    ///
    /// Arguments
    /// ---------
    /// * `url`: the URL to fetch
    ///
    /// Return
    /// ------
    /// * The response body, or a [`SossimError`] if the request or the body read fails
    pub(crate) fn get_from_url<U>(&self, url: U) -> Result<String, SossimError>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        Ok(self
            .http_client
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?)
    }
}
