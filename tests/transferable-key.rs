//! Assembles a complete transferable secret key and round-trips it.

use pgp_packet::Packet;
use pgp_packet::UserID;
use pgp_packet::crypto::mpi;
use pgp_packet::key::{Key, PublicSubkey, SecretKey};
use pgp_packet::packet::Signature;
use pgp_packet::packet::subpacket::{
    SubpacketArea,
    SubpacketTag,
    SubpacketValue,
};
use pgp_packet::parse::Parse;
use pgp_packet::serialize::Marshal;
use pgp_packet::types::{
    Curve,
    KeyFlags,
    PublicKeyAlgorithm,
    SymmetricAlgorithm,
};
use pgp_packet::wire::Decoder;

fn ed25519_primary(seed: u8) -> (SecretKey, [u8; 32]) {
    use ed25519_dalek::SigningKey;

    let signing_key = SigningKey::from_bytes(&[seed; 32]);
    let vk = signing_key.verifying_key().to_bytes();

    let mut q = vec![0x40];
    q.extend_from_slice(&vk);

    (Key::with_secret(
        1554103728,
        PublicKeyAlgorithm::EdDSA,
        mpi::PublicKey::EdDSA {
            curve: Curve::Ed25519,
            q: mpi::MPI::new(&q),
        },
        mpi::SecretKeyMaterial::EdDSA {
            scalar: mpi::MPI::new(&[seed; 32]).into(),
        }).unwrap(),
     vk)
}

fn encryption_subkey() -> PublicSubkey {
    Key::new(
        1554103730,
        PublicKeyAlgorithm::ECDH,
        mpi::PublicKey::ECDH {
            curve: Curve::Cv25519,
            q: mpi::MPI::new(&[0x40; 33]),
            hash: pgp_packet::types::HashAlgorithm::SHA256,
            sym: SymmetricAlgorithm::AES256,
        })
}

#[test]
fn transferable_key_roundtrip() {
    let (primary, vk) = ed25519_primary(0x2a);
    let userid = UserID::from("Anne Onymous <anonymous@example.org>");

    let mut certification_hashed = SubpacketArea::empty();
    certification_hashed.add(
        SubpacketValue::SignatureCreationTime(1554103728));
    certification_hashed.add(SubpacketValue::KeyFlags(
        KeyFlags::empty()
            .set_certification(true)
            .set_signing(true)));
    certification_hashed.add(SubpacketValue::PreferredSymmetricAlgorithms(
        vec![SymmetricAlgorithm::AES256, SymmetricAlgorithm::AES128]));
    let mut certification_unhashed = SubpacketArea::empty();
    certification_unhashed.add(
        SubpacketValue::Issuer(primary.keyid().unwrap()));

    let certification = Signature::certify_userid(
        &primary, &userid,
        certification_hashed, certification_unhashed).unwrap();

    let subkey = encryption_subkey();
    let mut binding_hashed = SubpacketArea::empty();
    binding_hashed.add(SubpacketValue::SignatureCreationTime(1554103730));
    binding_hashed.add(SubpacketValue::KeyFlags(
        KeyFlags::empty()
            .set_transport_encryption(true)
            .set_storage_encryption(true)));

    let binding = Signature::bind_subkey(
        &primary, &subkey,
        binding_hashed, SubpacketArea::empty()).unwrap();

    // Serialize the whole transferable key into one buffer.
    let packets = vec![
        Packet::SecretKey(primary.clone()),
        Packet::UserID(userid.clone()),
        Packet::Signature(certification.clone()),
        Packet::PublicSubkey(subkey.clone()),
        Packet::Signature(binding.clone()),
    ];

    let mut buf = Vec::new();
    for packet in &packets {
        buf.extend_from_slice(&packet.to_vec().unwrap());
    }

    // And read it back, packet by packet.
    let mut dec = Decoder::new(&buf);
    let mut parsed = Vec::new();
    while !dec.is_empty() {
        parsed.push(Packet::parse(&mut dec).unwrap());
    }
    assert_eq!(parsed, packets);

    // The certification's stored prefix matches the recomputed
    // transcript digest, and the signature verifies.
    let digest = certification
        .userid_binding_digest(&primary, &userid).unwrap();
    assert_eq!(&digest[..2], certification.digest_prefix());
    verify_eddsa(&certification, &digest, &vk);

    let digest = binding
        .subkey_binding_digest(&primary, &subkey).unwrap();
    assert_eq!(&digest[..2], binding.digest_prefix());
    verify_eddsa(&binding, &digest, &vk);

    // The issuer recorded in the certification is the primary key.
    match parsed[2] {
        Packet::Signature(ref sig) => {
            assert_eq!(sig.unhashed_area().lookup(SubpacketTag::Issuer),
                       Some(&SubpacketValue::Issuer(
                           primary.keyid().unwrap())));
        },
        ref packet => panic!("expected a signature, got {:?}", packet),
    }
}

fn verify_eddsa(sig: &Signature, digest: &[u8], vk: &[u8; 32]) {
    use ed25519_dalek::VerifyingKey;

    let (r, s) = match sig.mpis() {
        mpi::Signature::EdDSA { r, s } => (r, s),
        mpis => panic!("expected EdDSA mpis, got {:?}", mpis),
    };
    let mut raw = [0u8; 64];
    raw[..32].copy_from_slice(&r.value_padded(32).unwrap());
    raw[32..].copy_from_slice(&s.value_padded(32).unwrap());

    VerifyingKey::from_bytes(vk).unwrap()
        .verify_strict(digest, &ed25519_dalek::Signature::from_bytes(&raw))
        .unwrap();
}
