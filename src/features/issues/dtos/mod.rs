mod issue_dto;

pub use issue_dto::{CreateIssueDto, CreateIssueResponseDto, IssueResponseDto, ListIssuesQuery};
