//! Offer/answer negotiation through the public session API

use proptest::prelude::*;
use sigmedia_session_core::prelude::*;

fn descriptor(address: &str, port: u16, setup: SetupRole, types: &[&str]) -> MediaDescriptor {
    MediaDescriptor::new(address, port, setup).with_accept_types(types.iter().copied())
}

fn answered(local: SetupRole, remote: SetupRole) -> MediaSession {
    let mut session = MediaSession::new();
    session
        .set_local(descriptor("10.0.0.1", 2855, local, &["text/plain"]))
        .unwrap();
    session
        .set_remote(descriptor("10.0.0.2", 7394, remote, &["text/plain"]))
        .unwrap();
    session
}

#[test]
fn every_role_pair_has_the_tabled_outcome() {
    use SetupRole::*;

    let expected = [
        (Active, Active, Err(FailureReason::RoleConflict)),
        (Active, Passive, Ok(Active)),
        (Active, Actpass, Ok(Active)),
        (Active, Holdconn, Ok(Holdconn)),
        (Passive, Active, Ok(Passive)),
        (Passive, Passive, Err(FailureReason::RoleConflict)),
        (Passive, Actpass, Ok(Passive)),
        (Passive, Holdconn, Ok(Holdconn)),
        (Actpass, Active, Ok(Passive)),
        (Actpass, Passive, Ok(Active)),
        (Actpass, Actpass, Err(FailureReason::Indeterminate)),
        (Actpass, Holdconn, Ok(Holdconn)),
        (Holdconn, Active, Ok(Holdconn)),
        (Holdconn, Passive, Ok(Holdconn)),
        (Holdconn, Actpass, Ok(Holdconn)),
        (Holdconn, Holdconn, Ok(Holdconn)),
    ];

    for (local, remote, outcome) in expected {
        let mut session = answered(local, remote);
        let result = session.resolve();
        match outcome {
            Ok(role) => {
                assert_eq!(result.unwrap(), role, "{local} x {remote}");
                assert_eq!(session.state(), SessionState::Negotiated);
                assert_eq!(session.negotiated().unwrap().setup, role);
            }
            Err(reason) => {
                assert!(
                    matches!(result, Err(MediaSessionError::RoleConflict { local: l, remote: r, .. }) if l == local && r == remote),
                    "{local} x {remote}"
                );
                assert_eq!(session.state(), SessionState::Failed(reason));
            }
        }
    }
}

#[test]
fn passive_role_uses_local_address() {
    let mut session = answered(SetupRole::Passive, SetupRole::Active);
    session.resolve().unwrap();
    let negotiated = session.negotiated().unwrap();
    assert_eq!((negotiated.address.as_str(), negotiated.port), ("10.0.0.1", 2855));
}

#[test]
fn active_role_uses_remote_address() {
    let mut session = answered(SetupRole::Actpass, SetupRole::Passive);
    session.resolve().unwrap();
    let negotiated = session.negotiated().unwrap();
    assert_eq!((negotiated.address.as_str(), negotiated.port), ("10.0.0.2", 7394));
}

#[test]
fn negotiated_types_follow_local_preference() {
    let mut session = MediaSession::new();
    session
        .set_local(descriptor(
            "10.0.0.1",
            2855,
            SetupRole::Active,
            &["message/cpim", "text/plain", "image/*"],
        ))
        .unwrap();
    session
        .set_remote(descriptor(
            "10.0.0.2",
            2855,
            SetupRole::Passive,
            &["text/plain", "image/png", "message/cpim", "image/jpeg"],
        ))
        .unwrap();
    session.resolve().unwrap();
    assert_eq!(
        session.negotiated().unwrap().accept_types,
        vec!["message/cpim", "text/plain", "image/png", "image/jpeg"]
    );
}

#[test]
fn descriptors_from_sdp_attributes() {
    let local = MediaDescriptor::from_attributes(
        "10.0.0.1",
        2855,
        [
            ("setup", "actpass"),
            ("accept-types", "text/plain message/cpim"),
            ("path", "msrp://10.0.0.1:2855/abc;tcp"),
        ],
    )
    .unwrap();
    let remote = MediaDescriptor::from_attributes("10.0.0.2", 2855, [("setup", "ACTIVE"), ("accept-types", "*")])
        .unwrap();

    let mut session = MediaSession::new();
    session.set_local(local).unwrap();
    session.set_remote(remote).unwrap();
    assert_eq!(session.resolve().unwrap(), SetupRole::Passive);

    let negotiated = session.negotiated().unwrap();
    assert_eq!(negotiated.accept_types, vec!["text/plain", "message/cpim"]);
    assert_eq!(negotiated.attribute("path"), Some("msrp://10.0.0.1:2855/abc;tcp"));
}

#[test]
fn missing_setup_attribute_is_rejected() {
    let result = MediaDescriptor::from_attributes("10.0.0.1", 2855, [("accept-types", "text/plain")]);
    assert!(matches!(result, Err(MediaSessionError::InvalidRole(_))));
}

#[test]
fn failed_round_requires_teardown() {
    let mut session = answered(SetupRole::Actpass, SetupRole::Actpass);
    assert!(session.resolve().is_err());
    assert!(matches!(
        session.set_local(descriptor("10.0.0.1", 2855, SetupRole::Active, &["text/plain"])),
        Err(MediaSessionError::AlreadyOffered)
    ));

    session
        .renegotiate(descriptor("10.0.0.1", 2855, SetupRole::Active, &["text/plain"]))
        .unwrap();
    session
        .set_remote(descriptor("10.0.0.2", 2855, SetupRole::Actpass, &["text/plain"]))
        .unwrap();
    assert_eq!(session.resolve().unwrap(), SetupRole::Active);
    assert_eq!(session.round(), 1);
}

fn media_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("*".to_string()),
        "(text|image|message)/\\*",
        "(text|image|message)/(plain|png|cpim|html)",
    ]
}

proptest! {
    #[test]
    fn intersection_is_accepted_by_both_sides(
        local in prop::collection::vec(media_type(), 0..5),
        remote in prop::collection::vec(media_type(), 0..5),
    ) {
        let local_desc = MediaDescriptor::new("h", 1, SetupRole::Active).with_accept_types(local.iter().cloned());
        let remote_desc = MediaDescriptor::new("h", 1, SetupRole::Passive).with_accept_types(remote.iter().cloned());

        let common = intersect_accept_types(&local, &remote);
        for t in &common {
            prop_assert!(local_desc.accepts(t), "{} not accepted locally", t);
            prop_assert!(remote_desc.accepts(t), "{} not accepted remotely", t);
        }
        for (i, a) in common.iter().enumerate() {
            prop_assert!(!common[i + 1..].iter().any(|b| b.eq_ignore_ascii_case(a)));
        }
    }
}
