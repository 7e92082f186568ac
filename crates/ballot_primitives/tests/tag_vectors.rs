use ballot_primitives::{constants, h_tag, merkle_root};
use hex::ToHex;

#[test]
fn tag_digests_match_known_vectors() {
    // SHA3-256 of the bare tag: no parts means no length frames.
    let vectors = [
        (constants::TAG_MERKLE_EMPTY, "59f345387d88a8cfe67b1b4609333769f710715fa39a9d30f7f39a1332f95a99"),
        (constants::TAG_MERKLE_LEAF, "e99721990e2e58282f9f0802d7085bfe40cfc671fcfce5c4b9e63975e4c1ea17"),
        (constants::TAG_MERKLE_NODE, "e8ac2a614bab9cfb1792292755d85707fb90d9e81fdd0227b3993eb6ce06b060"),
        (constants::TAG_VOTE_CAST, "59f7a466f29e39ef8dbafcb8d14cb59a9662dabf249bf2b08c1259fc60b5eeb1"),
    ];
    for (tag, expected) in vectors {
        assert_eq!(h_tag(tag, &[]).encode_hex::<String>(), expected, "{tag}");
    }
    assert_eq!(
        merkle_root(&[]).encode_hex::<String>(),
        "59f345387d88a8cfe67b1b4609333769f710715fa39a9d30f7f39a1332f95a99"
    );
}

#[test]
fn tag_digests_are_distinct() {
    let a = h_tag(constants::TAG_MERKLE_LEAF, &[b"x"]);
    let b = h_tag(constants::TAG_MERKLE_NODE, &[b"x"]);
    assert_ne!(a, b);
    // Length framing separates ["ab","c"] from ["a","bc"].
    assert_ne!(
        h_tag(constants::TAG_VOTE_CAST, &[b"ab", b"c"]),
        h_tag(constants::TAG_VOTE_CAST, &[b"a", b"bc"])
    );
}
