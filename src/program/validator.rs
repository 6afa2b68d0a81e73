//! Applied validators.
//!
//! An [`AppliedValidator`] caches the derivation
//! `template + params -> script -> (policy id, lock address)`. It is built once
//! and never mutated; rebuilding with other params yields a new descriptor.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::network::Network;
use crate::program::address::{policy_id, ScriptAddress, StakeCredential};
use crate::program::codec::to_wire;
use crate::program::data::PlutusData;
use crate::program::error::{ApplicationError, SdkResult};
use crate::program::script::{PlutusVersion, Script, ScriptKind};

// ============================================================================
// Script Template
// ============================================================================

/// A compiled script before parameter application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTemplate {
    title: Option<String>,
    script: Script,
    arity: Option<usize>,
}

impl ScriptTemplate {
    /// Template with no title and an unknown parameter count.
    pub fn new(script: Script) -> Self {
        Self {
            title: None,
            script,
            arity: None,
        }
    }

    /// Template from CBOR-wrapped compiled code hex. The program must decode.
    pub fn from_compiled_code(version: PlutusVersion, compiled_code: &str) -> SdkResult<Self> {
        let script = Script::from_cbor_hex(version, compiled_code)?;
        script.program()?;
        Ok(Self::new(script))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Declare how many parameters the template takes.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Declared parameter count, when known.
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }
}

// ============================================================================
// Applicators
// ============================================================================

/// Applies parameters to a script template.
pub trait ParamApplicator {
    fn apply(
        &self,
        template: &ScriptTemplate,
        params: &[PlutusData],
    ) -> Result<Script, ApplicationError>;
}

/// Applicator that decodes the flat program, wraps it in one `Apply` node per
/// parameter (each argument a data constant), and re-encodes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatApplicator;

impl ParamApplicator for FlatApplicator {
    fn apply(
        &self,
        template: &ScriptTemplate,
        params: &[PlutusData],
    ) -> Result<Script, ApplicationError> {
        if let Some(expected) = template.arity() {
            if expected != params.len() {
                return Err(ApplicationError::ArityMismatch {
                    expected,
                    actual: params.len(),
                });
            }
        }

        let script = template.script();
        match script.kind() {
            ScriptKind::Native if params.is_empty() => Ok(script.clone()),
            ScriptKind::Native => Err(ApplicationError::NativeScript),
            ScriptKind::Plutus(_) if params.is_empty() => Ok(script.clone()),
            ScriptKind::Plutus(version) => {
                let program = params
                    .iter()
                    .fold(script.program()?, |program, param| {
                        program.apply_data(to_wire(param))
                    });
                Script::from_program(version, &program)
            }
        }
    }
}

// ============================================================================
// Applied Validator
// ============================================================================

/// A deployed script and the addressing data derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedValidator {
    validator: Script,
    policy_id: String,
    lock_address: String,
    params: Vec<PlutusData>,
}

impl AppliedValidator {
    /// Apply `params` to `template` with the flat applicator and derive an
    /// enterprise lock address on `network`.
    pub fn apply(
        template: &ScriptTemplate,
        params: Vec<PlutusData>,
        network: Network,
    ) -> SdkResult<Self> {
        Self::apply_with(template, params, network, None, &FlatApplicator)
    }

    /// Apply `params` with a custom applicator and optional stake credential.
    pub fn apply_with(
        template: &ScriptTemplate,
        params: Vec<PlutusData>,
        network: Network,
        stake: Option<StakeCredential>,
        applicator: &dyn ParamApplicator,
    ) -> SdkResult<Self> {
        let script = applicator.apply(template, &params)?;
        let applied = Self::from_script(script, params, network, stake)?;

        tracing::debug!(
            "Applied {} params to {}: policy {} at {}",
            applied.params.len(),
            template.title().unwrap_or("<untitled>"),
            applied.policy_id,
            applied.lock_address
        );

        Ok(applied)
    }

    /// Derive the descriptor for an already-applied script.
    pub fn from_script(
        validator: Script,
        params: Vec<PlutusData>,
        network: Network,
        stake: Option<StakeCredential>,
    ) -> SdkResult<Self> {
        let mut address = ScriptAddress::from_script(&validator, network);
        if let Some(stake) = stake {
            address = address.with_stake(stake);
        }

        Ok(Self {
            policy_id: policy_id(&validator),
            lock_address: address.to_bech32()?,
            validator,
            params,
        })
    }

    pub fn validator(&self) -> &Script {
        &self.validator
    }

    /// Hex policy id (script hash).
    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    /// Bech32 address locking funds under the validator.
    pub fn lock_address(&self) -> &str {
        &self.lock_address
    }

    /// Parameters in application order.
    pub fn params(&self) -> &[PlutusData] {
        &self.params
    }

    /// Decoded form of [`Self::lock_address`].
    pub fn script_address(&self) -> SdkResult<ScriptAddress> {
        Ok(ScriptAddress::from_bech32(&self.lock_address)?)
    }
}

/// Serializes as `{validator: {type, script}, policyId, lockAddress, params}`,
/// with the script double-CBOR hex and params in detailed JSON.
impl Serialize for AppliedValidator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct ScriptJson {
            #[serde(rename = "type")]
            kind: String,
            script: String,
        }

        let kind = match self.validator.kind() {
            ScriptKind::Native => "Native".to_string(),
            ScriptKind::Plutus(version) => version.to_string(),
        };

        let mut state = serializer.serialize_struct("AppliedValidator", 4)?;
        state.serialize_field(
            "validator",
            &ScriptJson {
                kind,
                script: self.validator.double_cbor_hex(),
            },
        )?;
        state.serialize_field("policyId", &self.policy_id)?;
        state.serialize_field("lockAddress", &self.lock_address)?;
        state.serialize_field("params", &self.params)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::error::SdkError;

    fn identity_template() -> ScriptTemplate {
        ScriptTemplate::from_compiled_code(PlutusVersion::V2, "46010000200101").unwrap()
    }

    #[test]
    fn test_apply_no_params() {
        let applied =
            AppliedValidator::apply(&identity_template(), vec![], Network::Preprod).unwrap();
        assert!(applied.params().is_empty());
        assert_eq!(applied.validator(), identity_template().script());
        assert_eq!(
            applied.policy_id(),
            "d28966b3926bf3b014e66e5440b3789b86b375499b1951d791cf783b"
        );
        assert_eq!(
            applied.lock_address(),
            "addr_test1wrfgje4njf4l8vq5ueh9gs9n0zdcdvm4fxd3j5whj88hswc37z3dn"
        );
    }

    #[test]
    fn test_apply_one_param() {
        let applied = AppliedValidator::apply(
            &identity_template(),
            vec![PlutusData::Integer(42)],
            Network::Preprod,
        )
        .unwrap();
        assert_eq!(hex::encode(applied.validator().bytes()), "010000320014c102182a0001");
        assert_eq!(
            applied.policy_id(),
            "ef73aa6157c79c0d16040fa4cda1d4b2221905a5f47627b0c8ce58db"
        );
        assert_eq!(
            applied.lock_address(),
            "addr_test1wrhh82np2lrecrgkqs86fndp6jezyxg95h68vfaser893kcptxc9j"
        );
        assert_eq!(applied.params(), &[PlutusData::Integer(42)]);
    }

    #[test]
    fn test_apply_params_in_order() {
        let one = PlutusData::Integer(1);
        let two = PlutusData::Integer(2);
        let forward = AppliedValidator::apply(
            &identity_template(),
            vec![one.clone(), two.clone()],
            Network::Preprod,
        )
        .unwrap();
        let reverse =
            AppliedValidator::apply(&identity_template(), vec![two, one], Network::Preprod)
                .unwrap();
        assert_ne!(forward.policy_id(), reverse.policy_id());

        // [[(lam x x) 1] 2]: the first param is applied innermost.
        let program = forward.validator().program().unwrap();
        let expected = identity_template()
            .script()
            .program()
            .unwrap()
            .apply_data(to_wire(&PlutusData::Integer(1)))
            .apply_data(to_wire(&PlutusData::Integer(2)));
        assert_eq!(program, expected);
    }

    #[test]
    fn test_partial_builtin_accepts_params() {
        // (program 1.0.0 [(builtin addInteger) (con integer 0)]) wrapped once
        let template =
            ScriptTemplate::from_compiled_code(PlutusVersion::V3, "480100003700900101").unwrap();
        let applied = AppliedValidator::apply(
            &template,
            vec![PlutusData::Bytes(vec![0xab; 70])],
            Network::Preview,
        )
        .unwrap();
        assert_eq!(applied.validator().program().unwrap().version, (1, 0, 0));
    }

    #[test]
    fn test_malformed_compiled_code_rejected() {
        let err = ScriptTemplate::from_compiled_code(PlutusVersion::V2, "43010203").unwrap_err();
        assert!(matches!(
            err,
            SdkError::Application(ApplicationError::MalformedProgram(_))
        ));
    }

    #[test]
    fn test_arity_mismatch() {
        let template = identity_template().with_arity(1);
        let err = AppliedValidator::apply(&template, vec![], Network::Preprod).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Application(ApplicationError::ArityMismatch {
                expected: 1,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_native_script_rejects_params() {
        let template = ScriptTemplate::new(Script::native(vec![0x82, 0x01, 0x80]));
        assert!(AppliedValidator::apply(&template, vec![], Network::Mainnet).is_ok());
        let err = AppliedValidator::apply(&template, vec![PlutusData::Integer(1)], Network::Mainnet)
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::Application(ApplicationError::NativeScript)
        ));
    }

    #[test]
    fn test_custom_applicator_is_used() {
        struct Fixed(Script);
        impl ParamApplicator for Fixed {
            fn apply(
                &self,
                _template: &ScriptTemplate,
                _params: &[PlutusData],
            ) -> Result<Script, ApplicationError> {
                Ok(self.0.clone())
            }
        }

        let fixed = Script::plutus(PlutusVersion::V3, vec![1, 0, 0, 0x20, 0x01, 0x01]);
        let applied = AppliedValidator::apply_with(
            &identity_template(),
            vec![PlutusData::Integer(1)],
            Network::Preview,
            None,
            &Fixed(fixed.clone()),
        )
        .unwrap();
        assert_eq!(applied.validator(), &fixed);
        assert_eq!(applied.policy_id(), fixed.hash_hex());
    }

    #[test]
    fn test_script_address_round_trip() {
        let applied =
            AppliedValidator::apply(&identity_template(), vec![], Network::Mainnet).unwrap();
        let address = applied.script_address().unwrap();
        assert_eq!(hex::encode(address.payment_hash()), applied.policy_id());
        assert_eq!(address.network_id(), 1);
    }

    #[test]
    fn test_serialize_shape() {
        let applied = AppliedValidator::apply(
            &identity_template(),
            vec![PlutusData::Integer(42)],
            Network::Preprod,
        )
        .unwrap();
        let json = serde_json::to_value(&applied).unwrap();
        assert_eq!(json["validator"]["type"], "PlutusV2");
        assert_eq!(json["validator"]["script"], "4d4c010000320014c102182a0001");
        assert_eq!(json["policyId"], applied.policy_id());
        assert_eq!(json["params"][0]["int"], 42);
    }
}
