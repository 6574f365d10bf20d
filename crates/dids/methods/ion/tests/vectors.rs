//! Operations and DIDs from the Sidetree v1.0.0 specification, checked under
//! a generic `did:sidetree` method.
use std::sync::Arc;

use did_ion::sidetree::{
    CreateOperation, DIDSuffix, FollowsError, Operation, Sidetree, SidetreeDID, VerificationError,
    VerifiedOperation,
};
use didsuite_crypto::{Algorithm, AlgorithmId, CryptoRegistry, JWK};

struct Example;

impl Sidetree for Example {
    const KEY_ALGORITHM: AlgorithmId = AlgorithmId::SECP256K1;
    const SIGNATURE_ALGORITHM: Algorithm = Algorithm::ES256K;
    const METHOD: &'static str = "sidetree";

    fn validate_key(key: &JWK) -> bool {
        did_ion::is_secp256k1(key)
    }
}

const SHORT_FORM_DID: &str = "did:sidetree:EiDyOQbbZAa3aiRzeCkV7LOx3SERjjH93EXoIM3UoN4oWg";

lazy_static::lazy_static! {
    static ref REGISTRY: Arc<CryptoRegistry> = Arc::new(CryptoRegistry::with_defaults());
}

fn long_form_did() -> &'static str {
    include_str!("fixtures/sidetree/long-form-did.txt").trim_end()
}

fn operation(fixture: &str) -> Operation {
    serde_json::from_str(fixture).unwrap()
}

fn create() -> CreateOperation {
    match operation(include_str!("fixtures/sidetree/create.json")) {
        Operation::Create(op) => op,
        other => panic!("expected create, got {other:?}"),
    }
}

fn verified(fixture: &str) -> VerifiedOperation {
    operation(fixture).verify::<Example>(&REGISTRY).unwrap()
}

fn verified_create() -> VerifiedOperation {
    verified(include_str!("fixtures/sidetree/create.json"))
}

fn verified_update() -> VerifiedOperation {
    verified(include_str!("fixtures/sidetree/update.json"))
}

fn verified_recover() -> VerifiedOperation {
    verified(include_str!("fixtures/sidetree/recover.json"))
}

fn verified_deactivate() -> VerifiedOperation {
    verified(include_str!("fixtures/sidetree/deactivate.json"))
}

#[test]
fn did_strings_round_trip() {
    let long: SidetreeDID<Example> = long_form_did().parse().unwrap();
    let short: SidetreeDID<Example> = SHORT_FORM_DID.parse().unwrap();
    assert_eq!(long.to_string(), long_form_did());
    assert_eq!(short.to_string(), SHORT_FORM_DID);
    assert_eq!(long.to_short(), short);
    assert!(long.is_long_form());
    assert!(!short.is_long_form());
    assert!(SHORT_FORM_DID.parse::<SidetreeDID<did_ion::ION>>().is_err());
}

#[test]
fn long_form_did_from_create() {
    let create = create();
    let did = SidetreeDID::<Example>::long(&create).unwrap();
    assert_eq!(did.to_string(), long_form_did());
    assert_eq!(
        DIDSuffix::from(did),
        DIDSuffix("EiDyOQbbZAa3aiRzeCkV7LOx3SERjjH93EXoIM3UoN4oWg".to_owned())
    );
}

#[test]
fn long_form_did_embeds_create() {
    let did: SidetreeDID<Example> = long_form_did().parse().unwrap();
    let embedded = did.create_operation().unwrap().unwrap();
    assert_eq!(embedded.suffix_data, create().suffix_data);
    assert_eq!(
        embedded.delta.update_commitment,
        create().delta.update_commitment
    );
    let short: SidetreeDID<Example> = SHORT_FORM_DID.parse().unwrap();
    assert!(short.create_operation().unwrap().is_none());
}

#[test]
fn create_verifies_to_its_suffix() {
    let create = verified_create();
    assert_eq!(
        create.did_suffix.unwrap().0,
        "EiDyOQbbZAa3aiRzeCkV7LOx3SERjjH93EXoIM3UoN4oWg"
    );
    assert!(create.revealed.is_none());
}

#[test]
fn update_and_recover_follow_create() {
    let create = verified_create();
    verified_update().follows(&create).unwrap();
    verified_recover().follows(&create).unwrap();
}

#[test]
fn deactivate_follows_recover() {
    let deactivate = verified_deactivate();
    deactivate.follows(&verified_recover()).unwrap();
    // The recover replaced the recovery commitment of the create.
    assert!(matches!(
        deactivate.follows(&verified_create()),
        Err(FollowsError::CommitmentMismatch)
    ));
}

#[test]
fn update_does_not_follow_itself() {
    let update = verified_update();
    assert!(matches!(
        update.follows(&update),
        Err(FollowsError::CommitmentMismatch)
    ));
    assert!(matches!(
        verified_create().follows(&update),
        Err(FollowsError::CreateCannotFollow)
    ));
}

#[test]
fn altered_reveal_value_fails_verification() {
    let mut value: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/sidetree/update.json")).unwrap();
    value["revealValue"] = "EiAJ-97Is59is6FKAProwDo870nmwCeP8n5nRRFwPpUZVQ".into();
    let update: Operation = serde_json::from_value(value).unwrap();
    assert!(matches!(
        update.verify::<Example>(&REGISTRY),
        Err(VerificationError::RevealValueMismatch { .. })
    ));
}

#[test]
fn invalid_suffixes_are_rejected() {
    for did in [
        "did:sidetree:",
        "did:sidetree:EiDyOQbb",
        "did:sidetree:AAAyOQbbZAa3aiRzeCkV7LOx3SERjjH93EXoIM3UoN4oWg",
        "did:sidetree:EiDyOQbbZAa3aiRzeCkV7LOx3SERjjH93EXoIM3UoN4oW!",
        "did:sidetree:EiDyOQbbZAa3aiRzeCkV7LOx3SERjjH93EXoIM3UoN4oWg:e30:extra",
    ] {
        assert!(did.parse::<SidetreeDID<Example>>().is_err(), "{did}");
    }
}
