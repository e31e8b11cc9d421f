pub mod pairs;
pub mod plan;

use clap::Args;
use teamforge::error::TfResult;
use teamforge::loader;
use teamforge::roster::AttendanceRequest;

/// Who is attending: a request file, inline lists, or both (inline lists win).
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// JSON attendance request
    #[arg(short = 'r', long)]
    pub request: Option<String>,

    #[arg(short = 'a', long, value_delimiter = ',')]
    pub attendees: Vec<String>,

    #[arg(short = 'f', long, value_delimiter = ',')]
    pub facilitators: Vec<String>,

    /// Force a group count instead of deriving it from the target group size
    #[arg(short = 'g', long)]
    pub groups: Option<usize>,
}

impl RequestArgs {
    pub fn load(&self) -> TfResult<AttendanceRequest> {
        let mut request = match &self.request {
            Some(path) => loader::load_request(path)?,
            None => AttendanceRequest::default(),
        };
        if !self.attendees.is_empty() {
            request.attendees = self.attendees.clone();
        }
        if !self.facilitators.is_empty() {
            request.facilitators = self.facilitators.clone();
        }
        if self.groups.is_some() {
            request.group_count_override = self.groups;
        }
        Ok(request)
    }
}
