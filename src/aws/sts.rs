use aws_config::{BehaviorVersion, Region};
use aws_sdk_sts::Client as StsClient;
use aws_smithy_types::error::display::DisplayErrorContext;
use tracing::{debug, info};

use super::Credentials;
use crate::{
    constants::DEFAULT_AWS_REGION,
    error::{ProviderError, ValidationError},
    params::Parameters,
};

/// MFA challenge attached to an AssumeRole call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaChallenge {
    pub serial_number: String,
    pub token_code: String,
}

/// Provider-facing AssumeRole request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub role_session_name: String,
    pub duration_seconds: i32,
    pub mfa: Option<MfaChallenge>,
}

impl AssumeRoleRequest {
    /// Build the request from validated parameters.
    ///
    /// The MFA fields are attached only when MFA is on, and then both must be set.
    pub fn from_parameters(params: &Parameters) -> Result<Self, ValidationError> {
        let mfa = if params.mfa {
            if params.mfa_token.is_empty() {
                return Err(ValidationError::MissingMfaToken);
            }
            if params.mfa_serial.is_empty() {
                return Err(ValidationError::MissingMfaSerial);
            }
            Some(MfaChallenge {
                serial_number: params.mfa_serial.clone(),
                token_code: params.mfa_token.clone(),
            })
        } else {
            None
        };

        Ok(Self {
            role_arn: params.role_arn.clone(),
            role_session_name: params.session_name.clone(),
            duration_seconds: params.duration_seconds,
            mfa,
        })
    }
}

/// Something that can exchange a base profile for role credentials
#[allow(async_fn_in_trait)]
pub trait RoleAssumer {
    async fn assume_role(
        &self,
        base_profile: &str,
        request: &AssumeRoleRequest,
    ) -> Result<Credentials, ProviderError>;
}

/// AWS STS backed role assumer
#[derive(Debug, Clone, Default)]
pub struct StsRoleAssumer;

impl RoleAssumer for StsRoleAssumer {
    async fn assume_role(
        &self,
        base_profile: &str,
        request: &AssumeRoleRequest,
    ) -> Result<Credentials, ProviderError> {
        info!("Calling AWS STS AssumeRole");
        debug!("Base profile: {}", base_profile);
        debug!("Role ARN: {}", request.role_arn);
        debug!("Session name: {}", request.role_session_name);
        debug!("Duration: {} seconds", request.duration_seconds);
        debug!("MFA: {}", request.mfa.is_some());

        // Priority: ENV vars -> Config file -> EC2 metadata -> DEFAULT_AWS_REGION
        let config = {
            let loaded = aws_config::defaults(BehaviorVersion::latest())
                .profile_name(base_profile)
                .load()
                .await;

            match loaded.region() {
                Some(region) => {
                    info!("Using region: {}", region);
                    loaded
                }
                None => {
                    info!(
                        "No region configured, using default {} for STS",
                        DEFAULT_AWS_REGION
                    );
                    aws_config::defaults(BehaviorVersion::latest())
                        .profile_name(base_profile)
                        .region(Region::new(DEFAULT_AWS_REGION))
                        .load()
                        .await
                }
            }
        };

        let client = StsClient::new(&config);

        let mut call = client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.role_session_name)
            .duration_seconds(request.duration_seconds);

        if let Some(mfa) = &request.mfa {
            call = call
                .serial_number(&mfa.serial_number)
                .token_code(&mfa.token_code);
        }

        let response = call
            .send()
            .await
            .map_err(|e| ProviderError::Call(DisplayErrorContext(&e).to_string()))?;

        let sts_creds = response.credentials().ok_or(ProviderError::NoCredentials)?;

        let credentials = Credentials {
            access_key_id: sts_creds.access_key_id().to_string(),
            secret_access_key: sts_creds.secret_access_key().to_string(),
            session_token: sts_creds.session_token().to_string(),
            expiration: Some(*sts_creds.expiration()),
        };

        info!("Successfully obtained AWS credentials");
        Ok(credentials)
    }
}
