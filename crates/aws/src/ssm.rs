//! SSM Parameter Store-backed [`ParameterStore`]

use async_trait::async_trait;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::types::ParameterType as SdkParameterType;
use aws_smithy_types::error::display::DisplayErrorContext;
use rotator_credential::{BoxError, Parameter, ParameterStore, ParameterType};
use secrecy::SecretString;

use crate::client::{AwsError, load_sdk_config};
use crate::config::AwsClientConfig;

/// Parameter reads and writes against SSM Parameter Store
#[derive(Clone, Debug)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from [`AwsClientConfig`]
    pub async fn from_config(config: &AwsClientConfig) -> Result<Self, AwsError> {
        let sdk = load_sdk_config(config).await?;
        Ok(Self::new(Client::new(&sdk)))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn from_sdk(value: &SdkParameterType) -> Result<ParameterType, BoxError> {
    match value {
        SdkParameterType::String => Ok(ParameterType::String),
        SdkParameterType::StringList => Ok(ParameterType::StringList),
        SdkParameterType::SecureString => Ok(ParameterType::SecureString),
        other => Err(format!("unsupported parameter type {}", other.as_str()).into()),
    }
}

fn to_sdk(value: ParameterType) -> SdkParameterType {
    match value {
        ParameterType::String => SdkParameterType::String,
        ParameterType::StringList => SdkParameterType::StringList,
        ParameterType::SecureString => SdkParameterType::SecureString,
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    #[tracing::instrument(skip(self), fields(service = "ssm"))]
    async fn get_parameter(&self, name: &str, decrypt: bool) -> Result<Option<Parameter>, BoxError> {
        let output = match self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(decrypt)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found()) =>
            {
                return Ok(None);
            }
            Err(err) => return Err(DisplayErrorContext(err).to_string().into()),
        };

        let param = output
            .parameter()
            .ok_or_else(|| format!("{name}: response carried no parameter"))?;
        let parameter_type = param
            .r#type()
            .ok_or_else(|| format!("{name}: parameter has no type"))
            .map_err(BoxError::from)
            .and_then(from_sdk)?;

        Ok(Some(Parameter {
            name: param.name().unwrap_or(name).to_string(),
            value: SecretString::from(param.value().unwrap_or_default().to_string()),
            parameter_type,
            version: param.version(),
            arn: param.arn().unwrap_or_default().to_string(),
        }))
    }

    #[tracing::instrument(skip(self, value), fields(service = "ssm"))]
    async fn put_parameter(
        &self,
        name: &str,
        value: &str,
        parameter_type: ParameterType,
    ) -> Result<i64, BoxError> {
        let output = self
            .client
            .put_parameter()
            .name(name)
            .value(value)
            .r#type(to_sdk(parameter_type))
            .overwrite(true)
            .send()
            .await
            .map_err(|err| DisplayErrorContext(err).to_string())?;

        Ok(output.version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ParameterType::String)]
    #[case(ParameterType::StringList)]
    #[case(ParameterType::SecureString)]
    fn sdk_type_mapping_is_lossless(#[case] ty: ParameterType) {
        assert_eq!(from_sdk(&to_sdk(ty)).unwrap(), ty);
    }

    #[test]
    fn unknown_sdk_type_is_an_error() {
        let unknown = SdkParameterType::from("Encrypted");
        assert!(from_sdk(&unknown).is_err());
    }
}
