use pgliteral::prelude::*;
use pretty_assertions::assert_eq;

fn text(items: &[&str]) -> Vec<Element> {
    items.iter().map(|s| Element::from(*s)).collect()
}

#[test]
fn test_array_parsing() {
    let parser = ArrayParser::new();
    assert_eq!(parser.parse(None).unwrap(), None);
    assert_eq!(parser.parse(Some("{}")).unwrap(), Some(vec![]));
    assert_eq!(
        parser.parse(Some("{NULL,NULL}")).unwrap(),
        Some(vec![Element::Null, Element::Null])
    );
    assert_eq!(parser.parse(Some("{1,2,3}")).unwrap(), Some(text(&["1", "2", "3"])));
    assert_eq!(
        parser.parse(Some("{{text},{NULL},{1}}")).unwrap(),
        Some(vec![
            Element::Array(text(&["text"])),
            Element::Array(vec![Element::Null]),
            Element::Array(text(&["1"])),
        ])
    );
}

#[test]
fn test_array_idempotence() {
    let parser = ArrayParser::new();
    let value = vec![
        Element::Array(text(&["a", "b"])),
        Element::Array(vec![Element::Null, Element::from("c")]),
    ];
    let rendered = parser.encode(&value);
    assert_eq!(rendered, "{{a,b},{NULL,c}}");
    assert_eq!(parser.parse(Some(&rendered)).unwrap(), Some(value));
}

#[test]
fn test_array_rejects_text_after_quote() {
    let err = ArrayParser::new().parse(Some(r#"{"a"b,c}"#)).unwrap_err();
    assert!(matches!(err, LiteralError::UnsupportedFormat { kind: "array", .. }));
}

#[test]
fn test_composite_parsing() {
    let parser = StructuredParser::new();
    assert_eq!(parser.parse("()").unwrap(), Some(vec![None]));
    assert_eq!(parser.parse("(,)").unwrap(), Some(vec![None, None]));
    assert_eq!(
        parser.parse("(10.0,USD)").unwrap(),
        Some(vec![Some("10.0".to_string()), Some("USD".to_string())])
    );
    assert_eq!(parser.parse("not-starting-with-paren").unwrap(), None);
}

#[test]
fn test_composite_idempotence() {
    let parser = CompositeParser::new();
    let value = vec![Some("10.0".to_string()), None, Some("USD".to_string())];
    assert_eq!(parser.parse(&parser.encode(&value)).unwrap(), Some(value));
}

#[test]
fn test_range_parsing() {
    let parser = RangeParser::new().as_int();
    assert_eq!(parser.parse(None).unwrap(), None);
    assert_eq!(parser.parse(Some("empty")).unwrap(), None);
    assert_eq!(parser.parse(Some("[3,7)")).unwrap(), Some(RangeBounds::new(3, 6)));
    assert_eq!(parser.parse(Some("(1,5)")).unwrap(), Some(RangeBounds::new(2, 4)));
    assert_eq!(parser.parse(Some("(,)")).unwrap(), Some(RangeBounds::unbounded()));
}

#[test]
fn test_range_format_error() {
    let err = RangeParser::new().as_int().parse(Some("3,7")).unwrap_err();
    assert!(matches!(err, LiteralError::UnsupportedFormat { kind: "range", .. }));
    assert_eq!(err.to_string(), "Unsupported range format: '3,7'");
}

#[test]
fn test_int4_range_width() {
    let err = RangeParser::new()
        .as_int()
        .parse(Some("[2147483648,9999999999)"))
        .unwrap_err();
    assert!(matches!(err, LiteralError::InvalidValue(_)));

    let column = RangeColumn::new("int4range").unwrap();
    assert!(matches!(
        column.db_typecast(vec![1i64, 3_000_000_000].into()),
        Err(LiteralError::InvalidValue(_))
    ));

    let column = RangeColumn::new("int8range").unwrap();
    assert_eq!(
        column.db_typecast(vec![1i64, 3_000_000_000].into()).unwrap(),
        Value::Text("[1,3000000000)".into())
    );
}

#[test]
fn test_multirange_parsing() {
    let parser = MultiRangeParser::new().as_multi_int();
    assert_eq!(parser.parse(Some("{}")).unwrap(), Some(vec![]));
    assert_eq!(
        parser.parse(Some("{[3,7)}")).unwrap(),
        Some(vec![RangeBounds::new(3, 6)])
    );
    assert!(matches!(
        parser.parse(Some("{,2147483649)}")),
        Err(LiteralError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_range_round_trip_every_kind() {
    let cases = [
        ("int4range", "[1,5]", "[1,6)"),
        ("int4range", "(1,5)", "[2,5)"),
        ("int4range", "(,5]", "(,6)"),
        ("int8range", "[10,20]", "[10,21)"),
        ("numrange", "(1.5,2.5]", "(1.5,2.5]"),
        ("daterange", "[2024-01-01,2024-01-31]", "[2024-01-01,2024-02-01)"),
        ("daterange", "(2024-02-28,)", "[2024-02-29,)"),
        (
            "tsrange",
            "[\"2024-01-01 10:00:00\",\"2024-01-01 12:00:00\")",
            "[\"2024-01-01 10:00:00\",\"2024-01-01 12:00:00\")",
        ),
        (
            "tstzrange",
            "[\"2024-01-01 10:00:00+00\",)",
            "[\"2024-01-01 10:00:00+00:00\",)",
        ),
        ("int4range", "empty", "empty"),
    ];

    for (db_type, input, expected) in cases {
        let column = RangeColumn::new(db_type).unwrap();
        let decoded = column.typecast(Some(input)).unwrap();
        let encoded = match column.db_typecast(decoded).unwrap() {
            Value::Text(literal) => literal,
            Value::Null => "empty".to_string(),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(encoded, expected, "{} {}", db_type, input);
    }
}

#[test]
fn test_column_factory_round_trip() {
    let column = ColumnFactory::new().from_db_type("int4multirange");
    let decoded = column.typecast(Some("{[1,3],(5,9)}")).unwrap();
    assert_eq!(
        column.db_typecast(decoded).unwrap(),
        Value::Text("{[1,4),[6,9)}".into())
    );
}

#[test]
fn test_empty_array_builder() {
    let mut params = Params::new();
    let sql = Expression::from(ArrayExpression::new(Vec::<Value>::new()))
        .to_sql(&mut params)
        .unwrap();
    assert_eq!(sql, "ARRAY[]");
    assert!(params.is_empty());
}

#[test]
fn test_null_builders() {
    let builder = PgQueryBuilder::new();
    let mut params = Params::new();
    assert_eq!(
        ArrayExpressionBuilder::new(&builder)
            .build(&ArrayExpression::new(Value::Null), &mut params)
            .unwrap(),
        "NULL"
    );
    assert_eq!(
        CompositeExpressionBuilder::new(&builder)
            .build(&CompositeExpression::new(Value::Null), &mut params)
            .unwrap(),
        "NULL"
    );
    let fields = vec![
        CompositeField::new("value").with_column(ColumnFactory::new().from_db_type("numeric")),
        CompositeField::new("currency_code").with_column(ColumnFactory::new().from_db_type("text")),
    ];
    assert_eq!(
        CompositeExpressionBuilder::new(&builder)
            .build(
                &CompositeExpression::new(Value::Map(vec![]))
                    .with_type("currency_money")
                    .with_fields(fields),
                &mut params
            )
            .unwrap(),
        "NULL"
    );
    assert!(params.is_empty());
}

#[test]
fn test_nested_bool_array_builder() {
    let value = Value::Array(vec![vec![true].into(), vec![false, true].into()]);
    let expr = ArrayExpression::new(value).with_type("bool").with_dimension(2);
    let mut params = Params::new();
    let sql = Expression::from(expr).to_sql(&mut params).unwrap();
    assert_eq!(sql, "ARRAY[ARRAY[:qp0]::bool[],ARRAY[:qp1,:qp2]::bool[]]::bool[][]");
    assert_eq!(params.len(), 3);
    assert_eq!(params.get(":qp2"), Some(&Value::Bool(true)));
}

#[test]
fn test_array_column_builds_through_element_column() {
    let column = ColumnFactory::new().from_db_type("bool[][]");
    let decoded = column.typecast(Some("{{t},{f,t}}")).unwrap();
    let mut params = Params::new();
    let encoded = column.db_typecast(decoded).unwrap();
    let sql = encoded.as_expr().unwrap().to_sql(&mut params).unwrap();
    assert_eq!(sql, "ARRAY[ARRAY[:qp0]::bool[],ARRAY[:qp1,:qp2]::bool[]]::bool[][]");
}

#[test]
fn test_range_builder() {
    let mut params = Params::new();
    let sql = Expression::from(RangeValue::int4(1, 5).with_bounds(true, true))
        .to_sql(&mut params)
        .unwrap();
    assert_eq!(sql, "int4range(:qp0,:qp1,'[)')");
    assert_eq!(
        params.into_inner(),
        vec![(":qp0".to_string(), Value::Int(1)), (":qp1".to_string(), Value::Int(6))]
    );
}

#[test]
fn test_big_int_float_fallback() {
    let parser = RangeParser::new().as_big_int().with_native_int64(false);
    let max_exact = 9007199254740992i64;
    let text = format!("[-{0},{0}]", max_exact);
    assert_eq!(
        parser.parse(Some(&text)).unwrap(),
        Some(RangeBounds::new(-(max_exact as f64), max_exact as f64))
    );

    let column = RangeColumn::new("int8range").unwrap().with_native_int64(false);
    let decoded = column.typecast(Some("[1,9007199254740990]")).unwrap();
    assert_eq!(
        column.db_typecast(decoded).unwrap(),
        Value::Text("[1,9007199254740991)".into())
    );
}

#[test]
fn test_config_drives_parsers_and_params() {
    let config = Config::from_toml_str(
        r#"
        [array]
        delimiter = ";"
        [builder]
        param_prefix = ":v"
        "#,
    )
    .unwrap();
    assert_eq!(
        config.array_parser().parse(Some("{a,b;c}")).unwrap(),
        Some(text(&["a,b", "c"]))
    );

    let mut params = config.params();
    let sql = config
        .query_builder()
        .build_expression(&RangeValue::numeric(0.5, Value::Null).into(), &mut params)
        .unwrap();
    assert_eq!(sql, "numrange(:v0,NULL,'[)')");
}

#[test]
fn test_convenience_functions() {
    assert_eq!(pgliteral::parse_array("{x}").unwrap(), text(&["x"]));
    assert_eq!(
        pgliteral::parse_range("[1,3)", "int8range").unwrap(),
        Some(RangeBounds::new(1, 2))
    );
    assert_eq!(
        pgliteral::parse_multirange("{[1,3),[5,6)}", "int4multirange").unwrap(),
        Some(vec![RangeBounds::new(1, 2), RangeBounds::new(5, 5)])
    );
    assert!(matches!(
        pgliteral::parse_range("[1,3)", "textrange"),
        Err(LiteralError::NotSupported(_))
    ));
}
