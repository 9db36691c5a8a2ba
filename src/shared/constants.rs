/// Status assigned to every newly reported issue
pub const DEFAULT_ISSUE_STATUS: &str = "reported";

// =============================================================================
// CLIENT-FACING MESSAGES
// =============================================================================

pub const MSG_INTERNAL_ERROR: &str = "Internal server error";
pub const MSG_NOT_FOUND: &str = "Not found";
pub const MSG_COORDINATES_REQUIRED: &str = "Latitude and longitude are required";
pub const MSG_MISSING_FIELDS: &str = "Missing required fields";
pub const MSG_EMPTY_TITLE_OR_DESCRIPTION: &str = "Title and description cannot be empty";
pub const MSG_EMPTY_CATEGORY: &str = "Category cannot be empty";
pub const MSG_ISSUE_CREATED: &str = "Issue created successfully";
