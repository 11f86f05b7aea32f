pub mod wpa_cli;

#[cfg(any(test, feature = "backend_mock"))]
pub mod mock;
