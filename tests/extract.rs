use rstest::rstest;
use std::path::PathBuf;
use tsdocs::{
    extract_from_files, CompilerOptions, DocumentationOptions, Error, InterfaceEntry,
    PartialOptions, Pattern, TagStrategy, TagValue,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn options(partial: PartialOptions) -> DocumentationOptions {
    let mut partial = PartialOptions {
        root_dir: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
        ..Default::default()
    }
    .merge(partial);
    partial
        .exclude_paths
        .get_or_insert_with(Vec::new)
        .push(Pattern::literal("node_modules/"));
    DocumentationOptions::from_partial(partial)
}

fn fixture_with(names: &[&str], partial: PartialOptions) -> Vec<InterfaceEntry> {
    let files: Vec<PathBuf> = names.iter().map(|n| fixture_path(n)).collect();
    extract_from_files(
        Some(files.as_slice()),
        &CompilerOptions::default(),
        &options(partial),
    )
    .unwrap()
}

fn fixture(name: &str) -> Vec<InterfaceEntry> {
    fixture_with(&[name], PartialOptions::default())
}

fn entry<'a>(entries: &'a [InterfaceEntry], name: &str) -> &'a InterfaceEntry {
    entries
        .iter()
        .find(|e| e.name() == name)
        .unwrap_or_else(|| panic!("no entry named {name}"))
}

fn property_names(entry: &InterfaceEntry) -> Vec<&str> {
    entry.properties.iter().map(|p| p.name()).collect()
}

fn patterns(list: &[&str]) -> Option<Vec<Pattern>> {
    Some(list.iter().map(|s| Pattern::parse(s).unwrap()).collect())
}

fn text(value: &str) -> TagValue {
    TagValue::Text(value.to_string())
}

// -- arguments --

#[test]
fn missing_file_list_is_invalid_argument() {
    let err = extract_from_files::<PathBuf>(
        None,
        &CompilerOptions::default(),
        &DocumentationOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(err.to_string().contains("expected array"));
}

#[test]
fn empty_file_list_is_empty() {
    let entries = extract_from_files::<PathBuf>(
        Some(&[][..]),
        &CompilerOptions { no_lib: true },
        &DocumentationOptions::default(),
    )
    .unwrap();
    assert!(entries.is_empty());
}

#[test]
fn unreadable_file_is_a_program_error() {
    let err = extract_from_files(
        Some(&[fixture_path("missing.ts")][..]),
        &CompilerOptions::default(),
        &DocumentationOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Program(_)));
    assert!(err.to_string().contains("missing.ts"));
}

// -- options --

#[rstest]
#[case("interface.ts")]
#[case("/.*\\.ts$/")]
fn exclude_paths_drops_whole_file(#[case] pattern: &str) {
    let entries = fixture_with(
        &["interface.ts"],
        PartialOptions {
            exclude_paths: patterns(&[pattern]),
            ..Default::default()
        },
    );
    assert!(entries.is_empty());
}

#[test]
fn exclude_names_drops_entries() {
    let entries = fixture_with(
        &["interface.ts"],
        PartialOptions {
            exclude_names: patterns(&["IInterface"]),
            ..Default::default()
        },
    );
    let names: Vec<_> = entries.iter().map(|e| e.name()).collect();
    assert!(!names.contains(&"IInterface"));
    assert!(names.contains(&"IChildInterface"));
}

#[test]
fn definition_files_only_expose_declaration_entries() {
    let entries = extract_from_files::<PathBuf>(
        Some(&[][..]),
        &CompilerOptions::default(),
        &options(PartialOptions {
            include_definition_files: Some(true),
            ..Default::default()
        }),
    )
    .unwrap();
    assert!(!entries.is_empty());
    for entry in &entries {
        assert!(entry.file_name().ends_with(".d.ts"), "{}", entry.file_name());
    }
}

#[test]
fn definition_files_skipped_by_default() {
    let entries = fixture_with(&["react.d.ts", "interface.ts"], PartialOptions::default());
    assert!(entries.iter().all(|e| !e.file_name().ends_with(".d.ts")));

    let entries = fixture_with(
        &["react.d.ts", "interface.ts"],
        PartialOptions {
            include_definition_files: Some(true),
            exclude_paths: patterns(&["lib.d.ts"]),
            ..Default::default()
        },
    );
    let react = entry(&entries, "ReactElement");
    assert_eq!(react.file_name(), "tests/fixtures/react.d.ts");
    assert_eq!(react.doc.documentation, "Anything React can render as a child");
}

// -- interfaces --

#[test]
fn interface_heritage() {
    let docs = fixture("interface.ts");
    assert_eq!(
        entry(&docs, "IChildInterface").extends,
        Some(vec!["IInterface".to_string(), "HTMLElement".to_string()])
    );
    assert_eq!(entry(&docs, "IInterface").extends, None);
}

#[test]
fn interface_documentation() {
    let docs = fixture("interface.ts");
    let iface = entry(&docs, "IInterface");
    assert_eq!(iface.doc.documentation, "An interface");
    assert_eq!(iface.doc.type_name, "interface");
    assert_eq!(iface.file_name(), "tests/fixtures/interface.ts");
    assert!(iface.properties.iter().all(|p| !p.doc.documentation.is_empty()));
}

#[test]
fn interface_properties_sorted() {
    let docs = fixture("interface.ts");
    assert_eq!(
        property_names(entry(&docs, "IInterface")),
        ["disabled", "fancy", "lastEdited", "value"]
    );
}

#[test]
fn interface_property_types() {
    let docs = fixture("interface.ts");
    let types: Vec<_> = entry(&docs, "IInterface")
        .properties
        .iter()
        .map(|p| p.doc.type_name.as_str())
        .collect();
    assert_eq!(types, ["boolean", "HTMLElement", "Date", "string"]);
    assert_eq!(
        entry(&docs, "IChildInterface").properties[0].doc.type_name,
        "() => void"
    );
}

#[test]
fn interface_optional_properties() {
    let docs = fixture("interface.ts");
    let optional: Vec<_> = entry(&docs, "IInterface")
        .properties
        .iter()
        .filter(|p| p.optional)
        .map(|p| p.name())
        .collect();
    assert_eq!(optional, ["disabled", "fancy"]);
}

#[test]
fn interface_default_tag_mirrored() {
    let docs = fixture("interface.ts");
    let disabled = entry(&docs, "IInterface").property("disabled").unwrap();
    assert_eq!(disabled.doc.documentation, "prevent interaction");
    assert_eq!(disabled.default, Some(text("false")));
}

#[test]
fn exclude_names_drops_members() {
    let docs = fixture_with(
        &["interface.ts"],
        PartialOptions {
            exclude_names: patterns(&["value", "/ed$/"]),
            ..Default::default()
        },
    );
    assert_eq!(property_names(entry(&docs, "IInterface")), ["fancy"]);
}

// -- consts --

#[test]
fn const_object_properties() {
    let docs = fixture("const.ts");
    let colors = entry(&docs, "colors");
    assert_eq!(property_names(colors), ["BLUE", "GREEN", "RED"]);
    assert_eq!(colors.properties[2].doc.documentation, "primary red");
    assert_eq!(colors.properties[2].doc.type_name, "string");
    assert!(colors.extends.is_none());
}

#[test]
fn basic_type_properties_off() {
    let docs = fixture("const.ts");
    assert_eq!(docs[1].name(), "FILE_NAME");
    assert_eq!(docs[1].doc.type_name, "\"documentation.ts\"");
    assert!(docs[1].properties.is_empty());
    assert_eq!(docs[2].name(), "MAX_WIDTH");
    assert_eq!(docs[2].doc.type_name, "100");
    assert!(docs[2].properties.is_empty());
}

#[test]
fn basic_type_properties_on() {
    let docs = fixture_with(
        &["const.ts"],
        PartialOptions {
            include_basic_type_properties: Some(true),
            ..Default::default()
        },
    );
    let names = property_names(&docs[1]);
    for expected in ["toString", "lastIndexOf", "match"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(!docs[2].properties.is_empty());
}

// -- classes --

#[test]
fn class_documentation() {
    let docs = fixture("class.ts");
    let class = entry(&docs, "Class");
    assert_eq!(class.doc.documentation.trim(), "A class");
    assert_eq!(class.doc.type_name, "class");
}

#[test]
fn class_instance_fields() {
    let docs = fixture("class.ts");
    let properties = &entry(&docs, "Class").properties;
    assert_eq!(properties.len(), 2);
    assert_eq!(properties[0].name(), "privateValue");
    assert_eq!(properties[0].doc.documentation.trim(), "private text value");
    assert_eq!(properties[1].name(), "publicValue");
    assert_eq!(properties[1].doc.documentation.trim(), "public text value");
    assert_eq!(properties[1].doc.type_name, "string");
}

#[test]
fn classes_can_be_skipped() {
    let docs = fixture_with(
        &["class.ts"],
        PartialOptions {
            include_classes: Some(false),
            ..Default::default()
        },
    );
    assert!(docs.is_empty());
}

// -- jsdoc tags --

#[rstest]
#[case("default")]
#[case("deprecated")]
#[case("internal")]
#[case("since")]
#[case("customFlag")]
fn detects_tag(#[case] tag: &str) {
    let docs = fixture("jsdoc.ts");
    let property = entry(&docs, "IJsDocInterface").property(tag).unwrap();
    assert!(property.doc.tags.contains_key(tag), "missing @{tag}");
    assert!(!property.doc.documentation.contains('@'));
}

#[test]
fn tag_values() {
    let docs = fixture("jsdoc.ts");
    let iface = entry(&docs, "IJsDocInterface");
    assert_eq!(iface.doc.tags.get("since"), Some(&text("0.5.0")));
    assert_eq!(iface.doc.documentation, "");

    let tags = |name: &str| &iface.property(name).unwrap().doc.tags;
    assert_eq!(tags("default")["default"], text("\"gilad\""));
    assert_eq!(tags("deprecated")["deprecated"], TagValue::Flag(true));
    assert_eq!(tags("customFlag")["customFlag"], text("Cool Dude"));
    assert!(tags("optional").is_empty());

    let deprecated = iface.property("deprecated").unwrap();
    assert_eq!(deprecated.deprecated, Some(TagValue::Flag(true)));
    assert_eq!(deprecated.default, None);
    assert_eq!(iface.property("internal").unwrap().internal, Some(TagValue::Flag(true)));

    let retired = iface.property("retired").unwrap();
    assert_eq!(retired.deprecated, Some(TagValue::Flag(true)));
    assert_eq!(retired.doc.tags["since"], text("0.4.0"));
    assert_eq!(retired.doc.documentation, "This one was retired.");
}

#[rstest]
#[case(TagStrategy::StripToken)]
#[case(TagStrategy::StripRun)]
fn strip_strategies_record_flag_tags_only(#[case] strategy: TagStrategy) {
    let docs = fixture_with(
        &["jsdoc.ts"],
        PartialOptions {
            tag_strategy: Some(strategy),
            ..Default::default()
        },
    );
    let iface = entry(&docs, "IJsDocInterface");
    assert!(iface.doc.tags.is_empty());
    for property in &iface.properties {
        assert!(!property.doc.documentation.contains('@'), "{}", property.name());
        assert!(!property.doc.tags.contains_key("since"));
        assert!(!property.doc.tags.contains_key("customFlag"));
    }
    let default = iface.property("default").unwrap();
    assert_eq!(default.doc.documentation, "This one has a default value.");
    assert_eq!(default.default, Some(text("\"gilad\"")));
    assert_eq!(
        iface.property("internal").unwrap().internal,
        Some(TagValue::Flag(true))
    );

    let retired = iface.property("retired").unwrap();
    assert_eq!(retired.doc.documentation, "This one was retired.");
    assert_eq!(retired.deprecated, Some(TagValue::Flag(true)));
    assert_eq!(retired.doc.tags.len(), 1);
}

// -- namespaces and external types --

#[test]
fn namespace_members_are_walked_and_qualified() {
    let docs = fixture("namespace.ts");
    let names: Vec<_> = docs.iter().map(|e| e.name()).collect();
    assert_eq!(names, ["Point", "Deep", "Line", "Canvas"]);

    let line = entry(&docs, "Line");
    assert_eq!(property_names(line), ["end", "nested", "start"]);
    assert_eq!(line.property("start").unwrap().doc.type_name, "Shapes.Point");
    assert_eq!(
        line.property("nested").unwrap().doc.type_name,
        "Shapes.Inner.Deep"
    );

    let canvas = entry(&docs, "Canvas");
    assert_eq!(canvas.property("origin").unwrap().doc.type_name, "Shapes.Point");
    assert_eq!(canvas.property("lines").unwrap().doc.type_name, "Shapes.Line[]");
}

#[test]
fn external_types_render_as_written() {
    let docs = fixture_with(&["react.d.ts", "external.ts"], PartialOptions::default());
    let types: Vec<_> = entry(&docs, "IReactProps")
        .properties
        .iter()
        .map(|p| p.doc.type_name.as_str())
        .collect();
    assert_eq!(
        types,
        ["React.MouseEventHandler<HTMLElement>", "React.ReactChild"]
    );
}

// -- determinism --

#[test]
fn extraction_is_idempotent() {
    let files = [
        fixture_path("interface.ts"),
        fixture_path("const.ts"),
        fixture_path("jsdoc.ts"),
    ];
    let opts = options(PartialOptions::default());
    let first = extract_from_files(Some(&files[..]), &CompilerOptions::default(), &opts).unwrap();
    let second = extract_from_files(Some(&files[..]), &CompilerOptions::default(), &opts).unwrap();
    assert_eq!(first, second);

    let names: Vec<_> = first.iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        [
            "IInterface",
            "IChildInterface",
            "colors",
            "FILE_NAME",
            "MAX_WIDTH",
            "IJsDocInterface"
        ]
    );
}
