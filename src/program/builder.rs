//! Fluent builder for applied validators.

use crate::network::Network;
use crate::program::address::StakeCredential;
use crate::program::data::PlutusData;
use crate::program::error::{SdkError, SdkResult};
use crate::program::validator::{AppliedValidator, FlatApplicator, ParamApplicator, ScriptTemplate};

/// Builder for creating applied validators with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use medrec_sdk::prelude::*;
///
/// let validator = AppliedValidatorBuilder::new()
///     .template(blueprint.template("medrec.mint")?)
///     .param(utxo_ref)
///     .network(Network::Preprod)
///     .build()?;
///
/// println!("policy {}", validator.policy_id());
/// ```
#[derive(Default)]
pub struct AppliedValidatorBuilder<'a> {
    template: Option<ScriptTemplate>,
    params: Vec<PlutusData>,
    network: Network,
    stake: Option<StakeCredential>,
    applicator: Option<&'a dyn ParamApplicator>,
}

impl<'a> AppliedValidatorBuilder<'a> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the script template (required).
    pub fn template(mut self, template: ScriptTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Append one parameter.
    pub fn param(mut self, param: PlutusData) -> Self {
        self.params.push(param);
        self
    }

    /// Append parameters, keeping their order.
    pub fn params(mut self, params: impl IntoIterator<Item = PlutusData>) -> Self {
        self.params.extend(params);
        self
    }

    /// Set the network (defaults to preprod).
    pub fn network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Delegate the lock address with a stake credential.
    pub fn stake(mut self, stake: StakeCredential) -> Self {
        self.stake = Some(stake);
        self
    }

    /// Use a custom applicator instead of [`FlatApplicator`].
    pub fn applicator(mut self, applicator: &'a dyn ParamApplicator) -> Self {
        self.applicator = Some(applicator);
        self
    }

    /// Apply the parameters and derive the descriptor.
    pub fn build(self) -> SdkResult<AppliedValidator> {
        let template = self
            .template
            .ok_or_else(|| SdkError::MissingField("template".to_string()))?;
        let applicator = self.applicator.unwrap_or(&FlatApplicator);
        AppliedValidator::apply_with(&template, self.params, self.network, self.stake, applicator)
    }
}
