//! SCIM schema models for API requests and responses.

pub mod scim_group;
pub mod scim_response;
pub mod scim_user;

pub use scim_group::{GroupAttributes, ScimGroup, ScimGroupMember, ScimMeta};
pub use scim_response::{
    ScimAttributes, ScimGroupListResponse, ScimListResponse, ScimPagination, ScimPatchOp,
    ScimPatchRequest, ScimUserListResponse,
};
pub use scim_user::ScimUser;
