// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! REST operation helpers.
//!
//! Request construction and response handling for each endpoint. The public
//! API is exposed through the `AdminClient` struct.

pub mod configdump;
pub mod enroll;
pub mod sign;

pub use configdump::{ConfigdumpQuery, save_response};
pub use enroll::{csr_to_pem, validate_csr};
