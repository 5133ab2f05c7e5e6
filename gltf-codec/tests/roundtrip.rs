//! Read-then-write round trips checked against an independent JSON parser.
//!
//! `serde_json` serves as the oracle: whatever the codec writes must parse,
//! and must describe the same tree as the input wherever the input already
//! used the codec's spellings.

mod common;

use common::{init_logging, Gen};
use gltf_codec::{from_str, to_string, Camera, GltfRoot, Index, Property, Value};
use pretty_assertions::assert_eq;
use serde_json::Value as Json;

/// Document already in the writer's canonical form.
const SAMPLE: &str = concat!(
    r#"{"extensionsUsed":["KHR_materials_unlit"],"#,
    r#""asset":{"copyright":"CC0","generator":"sample","version":"2.0"},"#,
    r#""scene":0,"#,
    r#""scenes":[{"nodes":[0,2],"name":"Scene"}],"#,
    r#""nodes":["#,
    r#"{"children":[1],"rotation":[0.0,0.6,0.0,0.8],"name":"Rig"},"#,
    r#"{"camera":0,"translation":[0.0,1.5,8.0],"name":"Eye"},"#,
    r#"{"camera":1,"matrix":[1.0,0.0,0.0,0.0,0.0,1.0,0.0,0.0,0.0,0.0,1.0,0.0,0.0,20.0,0.0,1.0],"mesh":0}"#,
    r#"],"#,
    r#""cameras":["#,
    r#"{"perspective":{"aspectRatio":1.777,"yfov":0.6,"znear":0.01},"type":"perspective","name":"Wide"},"#,
    r#"{"orthographic":{"xmag":10.0,"ymag":10.0,"zfar":100.0,"znear":0.01},"type":"orthographic"}"#,
    r#"],"#,
    r#""meshes":[{"primitives":[{"attributes":{"POSITION":0},"material":0}]}],"#,
    r#""materials":[{"extensions":{"KHR_materials_unlit":{}},"extras":{"note":"flat"}}]}"#
);

fn oracle(text: &str) -> Json {
    serde_json::from_str(text).unwrap_or_else(|e| panic!("not valid JSON ({}): {}", e, text))
}

#[test]
fn test_canonical_document_is_fixed_point() {
    init_logging();
    let root = GltfRoot::from_str(SAMPLE).unwrap();
    assert_eq!(root.to_string().unwrap(), SAMPLE);
    root.check_references().unwrap();
}

#[test]
fn test_output_matches_oracle() {
    let root = GltfRoot::from_str(SAMPLE).unwrap();
    let out = root.to_string().unwrap();
    assert_eq!(oracle(&out), oracle(SAMPLE));
}

#[test]
fn test_reordered_input_matches_oracle() {
    // Same tree with members in a different order: the text changes, the
    // parsed structure does not.
    let input = r#"{"cameras":[{"type":"perspective","perspective":{"znear":0.1,"yfov":1.0}}],"asset":{"version":"2.0"},"extras":{"b":1,"a":[true,null]}}"#;
    let out = GltfRoot::from_str(input).unwrap().to_string().unwrap();
    assert_eq!(oracle(&out), oracle(input));
    assert_eq!(
        out,
        r#"{"asset":{"version":"2.0"},"cameras":[{"perspective":{"yfov":1.0,"znear":0.1},"type":"perspective"}],"extras":{"b":1,"a":[true,null]}}"#
    );
}

#[test]
fn test_whitespace_insensitive() {
    let mut gen = Gen::from_env_or_random();
    for _ in 0..20 {
        let spaced = gen.respace(SAMPLE);
        let root = GltfRoot::from_slice(&spaced)
            .unwrap_or_else(|e| panic!("seed {}: {}", gen.seed, e));
        assert_eq!(root.to_string().unwrap(), SAMPLE, "seed {}", gen.seed);
    }
}

#[test]
fn test_unknown_members_keep_relative_order() {
    init_logging();
    let mut gen = Gen::from_env_or_random();

    for _ in 0..50 {
        let mut names: Vec<String> = Vec::new();
        let mut members = Vec::new();
        for _ in 0..gen.geometric(0.8) {
            let name = gen.unknown_name();
            if names.contains(&name) {
                continue;
            }
            members.push(format!("\"{}\":{}", name, gen.json_value(3)));
            names.push(name);
        }

        // Interleave the unknown members with the modelled ones.
        let mut input = String::from("{");
        let split = members.len() / 2;
        for m in &members[..split] {
            input.push_str(m);
            input.push(',');
        }
        input.push_str(r#""type":"perspective","#);
        for m in &members[split..] {
            input.push_str(m);
            input.push(',');
        }
        input.push_str(r#""perspective":{"yfov":1.0,"znear":0.1}}"#);

        let camera: Camera =
            from_str(&input).unwrap_or_else(|e| panic!("seed {}: {} in {}", gen.seed, e, input));
        let seen: Vec<&str> = camera.extension_bag().iter().map(|(k, _)| k).collect();
        assert_eq!(seen, names, "seed {}", gen.seed);

        let mut expected = String::from(r#"{"perspective":{"yfov":1.0,"znear":0.1},"type":"perspective""#);
        for m in &members {
            expected.push(',');
            expected.push_str(m);
        }
        expected.push('}');
        assert_eq!(to_string(&camera).unwrap(), expected, "seed {}", gen.seed);
    }
}

#[test]
fn test_clone_is_independent() {
    let root = GltfRoot::from_str(SAMPLE).unwrap();
    let mut copy = root.clone();
    copy.cameras[0].child.name = Some("Narrow".into());
    copy.bag.insert("meshes", Value::Array(vec![]));
    copy.nodes[1].camera = Some(Index::new(1));

    assert_eq!(root.cameras[0].name(), Some("Wide"));
    assert_eq!(root.nodes[1].camera, Some(Index::new(0)));
    assert_eq!(root.to_string().unwrap(), SAMPLE);
    assert_ne!(copy.to_string().unwrap(), SAMPLE);
}

#[test]
fn test_resolve_through_nodes() {
    let root = GltfRoot::from_str(SAMPLE).unwrap();
    let scene = root.default_scene().unwrap().unwrap();
    let names: Vec<Option<&str>> = scene
        .nodes
        .iter()
        .map(|&i| root.get(i).unwrap().name())
        .collect();
    assert_eq!(names, vec![Some("Rig"), None]);

    let eye = root.get(root.nodes[0].children[0]).unwrap();
    let camera = root.get(eye.camera.unwrap()).unwrap();
    assert_eq!(camera.name(), Some("Wide"));
}

#[test]
fn test_parallel_parses() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GltfRoot>();
    assert_send_sync::<Index<Camera>>();

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| GltfRoot::from_str(SAMPLE).unwrap().to_string().unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), SAMPLE);
    }
}
