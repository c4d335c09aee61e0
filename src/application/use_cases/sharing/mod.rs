pub mod grant_role;
pub mod list_role_assignments;
pub mod remove_role;
