mod configdump_test;
#[cfg(feature = "csr-gen")]
mod enroll_test;
mod selector_test;
mod sign_test;
