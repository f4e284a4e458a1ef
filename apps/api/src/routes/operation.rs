use axum::http::Method;
use axum::routing::MethodFilter;

/// Every operation the API declares, in route-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DeleteJobApplication,
    ModifyJobApplication,
    ListOrSearchJobs,
    CreateJob,
    DeleteJob,
    ViewJob,
    ModifyJob,
    ViewApplicationsForJob,
    CreateJobApplication,
    StartSession,
    RegisterUser,
    DeleteUser,
    ViewUser,
    ModifyUser,
    ViewApplicationsForUser,
    ListJobsForUser,
}

impl Operation {
    pub const ALL: [Operation; 16] = [
        Operation::DeleteJobApplication,
        Operation::ModifyJobApplication,
        Operation::ListOrSearchJobs,
        Operation::CreateJob,
        Operation::DeleteJob,
        Operation::ViewJob,
        Operation::ModifyJob,
        Operation::ViewApplicationsForJob,
        Operation::CreateJobApplication,
        Operation::StartSession,
        Operation::RegisterUser,
        Operation::DeleteUser,
        Operation::ViewUser,
        Operation::ModifyUser,
        Operation::ViewApplicationsForUser,
        Operation::ListJobsForUser,
    ];

    /// The `operationId` in the OpenAPI document.
    pub fn operation_id(self) -> &'static str {
        match self {
            Operation::DeleteJobApplication => "DeleteJobApplicationWithId",
            Operation::ModifyJobApplication => "ModifyJobApplicationWithId",
            Operation::ListOrSearchJobs => "ListOrSearchAvailableJobs",
            Operation::CreateJob => "CreateJob",
            Operation::DeleteJob => "DeleteJobWithId",
            Operation::ViewJob => "ViewJobWithId",
            Operation::ModifyJob => "ModifyJobWithId",
            Operation::ViewApplicationsForJob => "ViewApplicationsForJob",
            Operation::CreateJobApplication => "CreateJobApplication",
            Operation::StartSession => "StartSession",
            Operation::RegisterUser => "RegisterUser",
            Operation::DeleteUser => "DeleteUserWithId",
            Operation::ViewUser => "ViewUserWithId",
            Operation::ModifyUser => "ModifyUserWithId",
            Operation::ViewApplicationsForUser => "ViewApplicationsForUser",
            Operation::ListJobsForUser => "ListJobsForUser",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::ListOrSearchJobs
            | Operation::ViewJob
            | Operation::ViewApplicationsForJob
            | Operation::ViewUser
            | Operation::ViewApplicationsForUser
            | Operation::ListJobsForUser => Method::GET,
            Operation::CreateJob
            | Operation::CreateJobApplication
            | Operation::StartSession
            | Operation::RegisterUser => Method::POST,
            Operation::ModifyJobApplication | Operation::ModifyJob | Operation::ModifyUser => {
                Method::PUT
            }
            Operation::DeleteJobApplication | Operation::DeleteJob | Operation::DeleteUser => {
                Method::DELETE
            }
        }
    }

    pub fn method_filter(self) -> MethodFilter {
        match self.method() {
            Method::GET => MethodFilter::GET,
            Method::POST => MethodFilter::POST,
            Method::PUT => MethodFilter::PUT,
            Method::DELETE => MethodFilter::DELETE,
            other => unreachable!("no operation is declared with method {other}"),
        }
    }

    /// Path template as written in the OpenAPI document.
    pub fn path(self) -> &'static str {
        match self {
            Operation::DeleteJobApplication | Operation::ModifyJobApplication => {
                "/job-applications/{id}"
            }
            Operation::ListOrSearchJobs | Operation::CreateJob => "/jobs",
            Operation::DeleteJob | Operation::ViewJob | Operation::ModifyJob => "/jobs/{id}",
            Operation::ViewApplicationsForJob | Operation::CreateJobApplication => {
                "/jobs/{id}/job-applications"
            }
            Operation::StartSession => "/sessions",
            Operation::RegisterUser => "/users",
            Operation::DeleteUser | Operation::ViewUser | Operation::ModifyUser => "/users/{id}",
            Operation::ViewApplicationsForUser => "/users/{id}/job-applications",
            Operation::ListJobsForUser => "/users/{id}/jobs",
        }
    }

    /// Path template in the router's capture syntax, under `base_url`.
    pub fn route(self, base_url: &str) -> String {
        format!("{base_url}{}", self.path().replace("{id}", ":id"))
    }
}
