// commit message policy checks

pub mod policy;
pub mod validator;

pub use policy::CommitPolicy;
pub use validator::{
    CommitCheck, CommitValidator, find_fragments, referenced_issues, validate_message,
};
