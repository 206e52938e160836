//! AWS Systems Manager Parameter Store backend.

use aws_config::BehaviorVersion;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::config::Region;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::types::{Parameter, ParameterType as SsmParameterType};

use crate::config::SyncOptions;
use crate::model::{ParameterType, Record};

use super::{PAGE_SIZE, Page, ParameterStore, Query, StoreError};

/// Parameter Store client for one profile and region.
#[derive(Debug, Clone)]
pub struct SsmStore {
    client: Client,
}

impl SsmStore {
    /// Build a client from the named profile and region.
    ///
    /// Credentials are loaded lazily by the SDK; no request is made here.
    pub async fn connect(options: &SyncOptions) -> Self {
        tracing::debug!(
            profile = %options.profile,
            region = %options.region,
            "Creating Parameter Store client"
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&options.profile)
            .region(Region::new(options.region.clone()))
            .load()
            .await;

        Self::from_client(Client::new(&config))
    }

    /// Wrap an existing SDK client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl ParameterStore for SsmStore {
    async fn list_page(&self, query: &Query, next_token: Option<&str>) -> Result<Page, StoreError> {
        let output = self
            .client
            .get_parameters_by_path()
            .path(&query.path)
            .recursive(query.recursive)
            .with_decryption(query.decrypt)
            .max_results(PAGE_SIZE)
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| StoreError::List {
                path: query.path.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let mut page = Page {
            next_token: output.next_token().map(str::to_string),
            ..Page::default()
        };

        for parameter in output.parameters() {
            match to_record(parameter) {
                Some(record) => page.records.push(record),
                None => page.skipped += 1,
            }
        }

        Ok(page)
    }

    async fn put(&self, record: &Record) -> Result<(), StoreError> {
        self.client
            .put_parameter()
            .name(&record.name)
            .value(&record.value)
            .r#type(to_ssm_type(record.kind))
            .overwrite(true)
            .send()
            .await
            .map_err(|e| StoreError::Put {
                name: record.name.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }
}

/// Convert an SDK parameter, skipping shapes a [`Record`] cannot hold.
fn to_record(parameter: &Parameter) -> Option<Record> {
    let Some(name) = parameter.name() else {
        tracing::warn!("Skipping parameter without a name");
        return None;
    };

    let kind = match parameter.r#type() {
        Some(SsmParameterType::String) => ParameterType::String,
        Some(SsmParameterType::SecureString) => ParameterType::SecureString,
        other => {
            tracing::warn!(
                name,
                kind = ?other,
                "Skipping parameter with unsupported type"
            );
            return None;
        }
    };

    let Some(value) = parameter.value() else {
        tracing::warn!(name, "Skipping parameter without a value");
        return None;
    };

    Some(Record::new(name, kind, value))
}

fn to_ssm_type(kind: ParameterType) -> SsmParameterType {
    match kind {
        ParameterType::String => SsmParameterType::String,
        ParameterType::SecureString => SsmParameterType::SecureString,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_record_maps_supported_types() {
        let parameter = Parameter::builder()
            .name("/app/key")
            .r#type(SsmParameterType::SecureString)
            .value("AQICAH...")
            .build();

        let record = to_record(&parameter).unwrap();
        assert_eq!(record.name, "/app/key");
        assert_eq!(record.kind, ParameterType::SecureString);
        assert_eq!(record.value, "AQICAH...");
    }

    #[test]
    fn test_to_record_skips_string_list() {
        let parameter = Parameter::builder()
            .name("/app/hosts")
            .r#type(SsmParameterType::StringList)
            .value("a,b,c")
            .build();

        assert!(to_record(&parameter).is_none());
    }

    #[test]
    fn test_to_record_skips_incomplete() {
        let unnamed = Parameter::builder()
            .r#type(SsmParameterType::String)
            .value("x")
            .build();
        assert!(to_record(&unnamed).is_none());

        let valueless = Parameter::builder()
            .name("/app/x")
            .r#type(SsmParameterType::String)
            .build();
        assert!(to_record(&valueless).is_none());
    }

    #[test]
    fn test_to_ssm_type() {
        assert_eq!(to_ssm_type(ParameterType::String), SsmParameterType::String);
        assert_eq!(
            to_ssm_type(ParameterType::SecureString),
            SsmParameterType::SecureString
        );
    }
}
