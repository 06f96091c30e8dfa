//! Pure domain services.

mod permission_calculator;

pub use permission_calculator::PermissionCalculator;
