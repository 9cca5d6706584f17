use crate::{descriptor::ConnectionDescriptor, error::AppError};

/// Where a connection descriptor comes from on the command line.
pub enum DescriptorSource {
    Json(String),
    Url(String),
}

pub fn parse_descriptor(source: &DescriptorSource) -> Result<ConnectionDescriptor, AppError> {
    match source {
        DescriptorSource::Json(json) => ConnectionDescriptor::from_json(json),
        DescriptorSource::Url(url) => ConnectionDescriptor::from_url(url),
    }
}
