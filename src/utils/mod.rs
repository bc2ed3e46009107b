pub mod certificate_id;
pub mod crypto;
pub mod validation;
