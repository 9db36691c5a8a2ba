mod issue;

pub use issue::{Issue, NearbyQuery, NewIssue};
