//! Code generation from API IR to Go AST.
//!
//! This module transforms the normalized IR (type definitions, operations)
//! into Go files: one models file per type definition and one client file.
//!
//! The generated AST can then be emitted to strings via the `Emit` trait.

use std::collections::HashSet;

use crate::openapi::config::GeneratorConfig;

use super::api::{ApiIR, OperationIR, TypeDefIR, TypeDefKind, UrlPart};
use super::normalize::ADDITIONAL_PROPERTIES_FIELD;
use super::types::{
    BinOp, GoDecl, GoExpr, GoField, GoFile, GoFunc, GoImport, GoParam, GoStmt, GoType, TypeExpr,
};

/// Leading comment of every generated file.
pub const GENERATED_HEADER: &str = "Code generated by specgen. DO NOT EDIT.";

const CLIENT_TYPE: &str = "Client";
const ERROR_TYPE: &str = "APIError";

// =============================================================================
// Helpers
// =============================================================================

fn ident(name: &str) -> GoExpr {
    GoExpr::ident(name)
}

fn pkg_call(package: &str, func: &str, args: Vec<GoExpr>) -> GoExpr {
    ident(package).select(func).call(args)
}

fn nil() -> GoExpr {
    ident("nil")
}

fn err_not_nil() -> GoExpr {
    ident("err").binary(BinOp::NotEqual, nil())
}

/// `if err != nil { return <results> }`
fn return_if_err(results: Vec<GoExpr>) -> GoStmt {
    GoStmt::If {
        init: None,
        cond: err_not_nil(),
        then_body: vec![GoStmt::Return(results)],
        else_body: None,
    }
}

/// `if err := <call>; err != nil { return <results> }`
fn check_call(call: GoExpr, results: Vec<GoExpr>) -> GoStmt {
    GoStmt::If {
        init: Some(Box::new(GoStmt::Define {
            names: vec!["err".into()],
            value: call,
        })),
        cond: err_not_nil(),
        then_body: vec![GoStmt::Return(results)],
        else_body: None,
    }
}

fn any_map() -> GoType {
    GoType::Map {
        key: Box::new(GoType::ident("string")),
        value: Box::new(GoType::ident("any")),
    }
}

fn import(path: &str) -> GoImport {
    GoImport {
        path: path.to_string(),
    }
}

fn file(package: &str, imports: Vec<GoImport>, decls: Vec<GoDecl>) -> GoFile {
    GoFile {
        header: Some(GENERATED_HEADER.to_string()),
        package: package.to_string(),
        imports,
        decls,
    }
}

// =============================================================================
// Models
// =============================================================================

/// Generate one models file per type definition, paired with its file name.
pub fn codegen_models(api: &ApiIR, config: &GeneratorConfig) -> Vec<(String, GoFile)> {
    let records: HashSet<&str> = api
        .types
        .iter()
        .filter(|def| matches!(def.kind, TypeDefKind::Record { .. }))
        .map(|def| def.name.as_str())
        .collect();

    api.types
        .iter()
        .map(|def| {
            (
                def.file_name(),
                codegen_type_def(def, &records, &config.output.models_package),
            )
        })
        .collect()
}

fn codegen_type_def(def: &TypeDefIR, records: &HashSet<&str>, package: &str) -> GoFile {
    match &def.kind {
        TypeDefKind::Record { fields } => {
            let declared = fields
                .iter()
                .map(|field| GoField {
                    name: field.ident.clone(),
                    ty: field_type(&field.ty, records),
                    tag: Some(format!("json:\"{},omitempty\"", field.json_name)),
                })
                .collect();
            let catch_all = GoField {
                name: ADDITIONAL_PROPERTIES_FIELD.to_string(),
                ty: any_map(),
                tag: Some("json:\"-\"".to_string()),
            };
            let decls = vec![
                GoDecl::Struct {
                    doc: vec![],
                    name: def.name.clone(),
                    groups: vec![declared, vec![catch_all]],
                },
                GoDecl::Func(codegen_unmarshal(&def.name)),
                GoDecl::Func(codegen_marshal(&def.name)),
            ];
            file(package, vec![import("encoding/json")], decls)
        }
        TypeDefKind::Sequence(item) => file(
            package,
            vec![],
            vec![GoDecl::TypeDef {
                name: def.name.clone(),
                ty: GoType::Slice(Box::new(item.to_go(None))),
            }],
        ),
        TypeDefKind::Alias(target) => file(
            package,
            vec![],
            vec![GoDecl::TypeDef {
                name: def.name.clone(),
                ty: target.to_go(None),
            }],
        ),
    }
}

/// Record-typed fields are pointers so recursive records stay finite.
fn field_type(ty: &TypeExpr, records: &HashSet<&str>) -> GoType {
    match ty {
        TypeExpr::Named(name) if records.contains(name.as_str()) => ty.to_go(None).pointer(),
        _ => ty.to_go(None),
    }
}

fn alias_of(name: &str) -> GoStmt {
    GoStmt::Raw(format!("type Alias {name}"))
}

fn as_alias(expr: GoExpr) -> GoExpr {
    GoExpr::Convert {
        ty: GoType::ident("Alias").pointer(),
        expr: Box::new(expr),
    }
}

/// Decode declared fields, then decode the whole object into the catch-all map.
fn codegen_unmarshal(name: &str) -> GoFunc {
    let catch_all = ident("m").select(ADDITIONAL_PROPERTIES_FIELD);
    GoFunc {
        doc: vec![],
        receiver: Some(GoParam::new("m", GoType::ident(name).pointer())),
        name: "UnmarshalJSON".into(),
        params: vec![GoParam::new(
            "data",
            GoType::Slice(Box::new(GoType::ident("byte"))),
        )],
        results: vec![GoType::ident("error")],
        body: vec![
            alias_of(name),
            check_call(
                pkg_call("json", "Unmarshal", vec![ident("data"), as_alias(ident("m"))]),
                vec![ident("err")],
            ),
            GoStmt::Assign {
                target: catch_all.clone(),
                value: ident("make").call(vec![GoExpr::Type(any_map())]),
            },
            check_call(
                pkg_call("json", "Unmarshal", vec![ident("data"), catch_all.addr()]),
                vec![ident("err")],
            ),
            GoStmt::Return(vec![nil()]),
        ],
    }
}

/// Start from the catch-all map and overlay the declared fields, which win on collision.
fn codegen_marshal(name: &str) -> GoFunc {
    let catch_all = ident("m").select(ADDITIONAL_PROPERTIES_FIELD);
    let copy_into_result = |source: GoExpr| GoStmt::Range {
        key: "k".into(),
        value: "v".into(),
        expr: source,
        body: vec![GoStmt::Assign {
            target: ident("result").index(ident("k")),
            value: ident("v"),
        }],
    };

    GoFunc {
        doc: vec![],
        receiver: Some(GoParam::new("m", GoType::ident(name))),
        name: "MarshalJSON".into(),
        params: vec![],
        results: vec![
            GoType::Slice(Box::new(GoType::ident("byte"))),
            GoType::ident("error"),
        ],
        body: vec![
            alias_of(name),
            GoStmt::Define {
                names: vec!["result".into()],
                value: ident("make").call(vec![
                    GoExpr::Type(any_map()),
                    ident("len").call(vec![catch_all.clone()]),
                ]),
            },
            copy_into_result(catch_all),
            GoStmt::Blank,
            GoStmt::Define {
                names: vec!["declared".into(), "err".into()],
                value: pkg_call("json", "Marshal", vec![as_alias(ident("m").addr())]),
            },
            return_if_err(vec![nil(), ident("err")]),
            GoStmt::Var {
                name: "fields".into(),
                ty: GoType::Map {
                    key: Box::new(GoType::ident("string")),
                    value: Box::new(GoType::Qualified {
                        package: "json".into(),
                        name: "RawMessage".into(),
                    }),
                },
            },
            check_call(
                pkg_call(
                    "json",
                    "Unmarshal",
                    vec![ident("declared"), ident("fields").addr()],
                ),
                vec![nil(), ident("err")],
            ),
            copy_into_result(ident("fields")),
            GoStmt::Blank,
            GoStmt::Return(vec![pkg_call("json", "Marshal", vec![ident("result")])]),
        ],
    }
}

// =============================================================================
// Client
// =============================================================================

/// Generate the client file.
pub fn codegen_client(api: &ApiIR, config: &GeneratorConfig) -> GoFile {
    let models = config.output.models_package.as_str();

    let mut imports: Vec<GoImport> = [
        "bytes",
        "encoding/json",
        "errors",
        "fmt",
        "io",
        "net/http",
        "net/url",
    ]
    .into_iter()
    .map(import)
    .collect();
    if api.operations.iter().any(references_models) {
        imports.push(import(&config.output.models_import));
    }

    let mut decls = vec![
        codegen_error_type(),
        GoDecl::Func(codegen_error_method()),
        codegen_client_struct(),
        GoDecl::Func(codegen_constructor()),
    ];
    decls.extend(codegen_getters().into_iter().map(GoDecl::Func));
    decls.push(GoDecl::Func(codegen_build_url()));
    decls.push(GoDecl::Func(codegen_set_headers(&config.tenant_header)));
    decls.push(GoDecl::Func(codegen_do()));
    decls.extend(
        api.operations
            .iter()
            .map(|op| GoDecl::Func(codegen_operation(op, models))),
    );

    file(&config.output.client_package, imports, decls)
}

fn references_models(op: &OperationIR) -> bool {
    op.request.is_some() || matches!(op.response, TypeExpr::Named(_))
}

fn codegen_error_type() -> GoDecl {
    GoDecl::Struct {
        doc: vec![format!(
            "{ERROR_TYPE} is returned when the server responds with status 400 or above."
        )],
        name: ERROR_TYPE.into(),
        groups: vec![vec![
            GoField {
                name: "StatusCode".into(),
                ty: GoType::ident("int"),
                tag: None,
            },
            GoField {
                name: "Body".into(),
                ty: GoType::ident("string"),
                tag: None,
            },
        ]],
    }
}

fn codegen_error_method() -> GoFunc {
    GoFunc {
        doc: vec![],
        receiver: Some(GoParam::new("e", GoType::ident(ERROR_TYPE).pointer())),
        name: "Error".into(),
        params: vec![],
        results: vec![GoType::ident("string")],
        body: vec![GoStmt::Return(vec![pkg_call(
            "fmt",
            "Sprintf",
            vec![
                GoExpr::Str("HTTP Error: %d - %s".into()),
                ident("e").select("StatusCode"),
                ident("e").select("Body"),
            ],
        )])],
    }
}

fn codegen_client_struct() -> GoDecl {
    let field = |name: &str, ty: GoType| GoField {
        name: name.into(),
        ty,
        tag: None,
    };
    GoDecl::Struct {
        doc: vec![format!("{CLIENT_TYPE} calls the API over HTTP.")],
        name: CLIENT_TYPE.into(),
        groups: vec![vec![
            field("baseURL", GoType::ident("string")),
            field("apiKey", GoType::ident("string")),
            field("organizationID", GoType::ident("string")),
            field(
                "httpClient",
                GoType::Qualified {
                    package: "http".into(),
                    name: "Client".into(),
                }
                .pointer(),
            ),
        ]],
    }
}

fn codegen_constructor() -> GoFunc {
    let http_client = GoExpr::Composite {
        ty: GoType::Qualified {
            package: "http".into(),
            name: "Client".into(),
        },
        fields: vec![],
        multiline: false,
    }
    .addr();

    GoFunc {
        doc: vec![format!(
            "NewClient returns a {CLIENT_TYPE} that authenticates with apiKey on behalf of organizationID."
        )],
        receiver: None,
        name: "NewClient".into(),
        params: vec![
            GoParam::new("baseURL", GoType::ident("string")),
            GoParam::new("apiKey", GoType::ident("string")),
            GoParam::new("organizationID", GoType::ident("string")),
        ],
        results: vec![GoType::ident(CLIENT_TYPE).pointer()],
        body: vec![GoStmt::Return(vec![
            GoExpr::Composite {
                ty: GoType::ident(CLIENT_TYPE),
                fields: vec![
                    ("baseURL".into(), ident("baseURL")),
                    ("apiKey".into(), ident("apiKey")),
                    ("organizationID".into(), ident("organizationID")),
                    ("httpClient".into(), http_client),
                ],
                multiline: true,
            }
            .addr(),
        ])],
    }
}

fn client_receiver() -> Option<GoParam> {
    Some(GoParam::new("c", GoType::ident(CLIENT_TYPE).pointer()))
}

fn codegen_getters() -> Vec<GoFunc> {
    [
        ("GetBaseURL", "baseURL"),
        ("GetAPIKey", "apiKey"),
        ("GetOrganizationID", "organizationID"),
    ]
    .into_iter()
    .map(|(name, field)| GoFunc {
        doc: vec![],
        receiver: client_receiver(),
        name: name.into(),
        params: vec![],
        results: vec![GoType::ident("string")],
        body: vec![GoStmt::Return(vec![ident("c").select(field)])],
    })
    .collect()
}

fn url_values() -> GoType {
    GoType::Qualified {
        package: "url".into(),
        name: "Values".into(),
    }
}

fn codegen_build_url() -> GoFunc {
    GoFunc {
        doc: vec![],
        receiver: client_receiver(),
        name: "buildURL".into(),
        params: vec![
            GoParam::new("path", GoType::ident("string")),
            GoParam::new("query", url_values()),
        ],
        results: vec![GoType::ident("string"), GoType::ident("error")],
        body: vec![
            GoStmt::Define {
                names: vec!["u".into(), "err".into()],
                value: pkg_call(
                    "url",
                    "Parse",
                    vec![ident("c")
                        .select("baseURL")
                        .binary(BinOp::Add, ident("path"))],
                ),
            },
            return_if_err(vec![GoExpr::Str(String::new()), ident("err")]),
            GoStmt::If {
                init: None,
                cond: ident("len")
                    .call(vec![ident("query")])
                    .binary(BinOp::Greater, GoExpr::Int(0)),
                then_body: vec![GoStmt::Assign {
                    target: ident("u").select("RawQuery"),
                    value: ident("query").select("Encode").call(vec![]),
                }],
                else_body: None,
            },
            GoStmt::Return(vec![ident("u").select("String").call(vec![]), nil()]),
        ],
    }
}

fn codegen_set_headers(tenant_header: &str) -> GoFunc {
    let set = |name: &str, value: GoExpr| {
        GoStmt::Expr(
            ident("req")
                .select("Header")
                .select("Set")
                .call(vec![GoExpr::Str(name.into()), value]),
        )
    };
    GoFunc {
        doc: vec![],
        receiver: client_receiver(),
        name: "setHeaders".into(),
        params: vec![GoParam::new(
            "req",
            GoType::Qualified {
                package: "http".into(),
                name: "Request".into(),
            }
            .pointer(),
        )],
        results: vec![],
        body: vec![
            set("Content-Type", GoExpr::Str("application/json".into())),
            set(
                "Authorization",
                GoExpr::Str("Bearer ".into()).binary(BinOp::Add, ident("c").select("apiKey")),
            ),
            set(tenant_header, ident("c").select("organizationID")),
        ],
    }
}

/// Shared request path: encode, send, map status >= 400 to *APIError, decode.
fn codegen_do() -> GoFunc {
    GoFunc {
        doc: vec![],
        receiver: client_receiver(),
        name: "do".into(),
        params: vec![
            GoParam::new("method", GoType::ident("string")),
            GoParam::new("path", GoType::ident("string")),
            GoParam::new("query", url_values()),
            GoParam::new("payload", GoType::ident("any")),
            GoParam::new("result", GoType::ident("any")),
        ],
        results: vec![GoType::ident("error")],
        body: vec![
            GoStmt::Define {
                names: vec!["target".into(), "err".into()],
                value: ident("c")
                    .select("buildURL")
                    .call(vec![ident("path"), ident("query")]),
            },
            return_if_err(vec![ident("err")]),
            GoStmt::Blank,
            GoStmt::Var {
                name: "body".into(),
                ty: GoType::Qualified {
                    package: "io".into(),
                    name: "Reader".into(),
                },
            },
            GoStmt::If {
                init: None,
                cond: ident("payload").binary(BinOp::NotEqual, nil()),
                then_body: vec![
                    GoStmt::Define {
                        names: vec!["data".into(), "err".into()],
                        value: pkg_call("json", "Marshal", vec![ident("payload")]),
                    },
                    return_if_err(vec![ident("err")]),
                    GoStmt::Assign {
                        target: ident("body"),
                        value: pkg_call("bytes", "NewReader", vec![ident("data")]),
                    },
                ],
                else_body: None,
            },
            GoStmt::Define {
                names: vec!["req".into(), "err".into()],
                value: pkg_call(
                    "http",
                    "NewRequest",
                    vec![ident("method"), ident("target"), ident("body")],
                ),
            },
            return_if_err(vec![ident("err")]),
            GoStmt::Expr(ident("c").select("setHeaders").call(vec![ident("req")])),
            GoStmt::Blank,
            GoStmt::Define {
                names: vec!["resp".into(), "err".into()],
                value: ident("c")
                    .select("httpClient")
                    .select("Do")
                    .call(vec![ident("req")]),
            },
            return_if_err(vec![ident("err")]),
            GoStmt::Defer(ident("resp").select("Body").select("Close").call(vec![])),
            GoStmt::Blank,
            GoStmt::If {
                init: None,
                cond: ident("resp")
                    .select("StatusCode")
                    .binary(BinOp::GreaterEqual, GoExpr::Int(400)),
                then_body: vec![
                    GoStmt::Define {
                        names: vec!["data".into(), "_".into()],
                        value: pkg_call("io", "ReadAll", vec![ident("resp").select("Body")]),
                    },
                    GoStmt::Return(vec![
                        GoExpr::Composite {
                            ty: GoType::ident(ERROR_TYPE),
                            fields: vec![
                                ("StatusCode".into(), ident("resp").select("StatusCode")),
                                (
                                    "Body".into(),
                                    ident("string").call(vec![ident("data")]),
                                ),
                            ],
                            multiline: false,
                        }
                        .addr(),
                    ]),
                ],
                else_body: None,
            },
            GoStmt::Blank,
            // An empty body decodes to the zero value
            GoStmt::If {
                init: Some(Box::new(GoStmt::Define {
                    names: vec!["err".into()],
                    value: pkg_call("json", "NewDecoder", vec![ident("resp").select("Body")])
                        .select("Decode")
                        .call(vec![ident("result")]),
                })),
                cond: err_not_nil().binary(
                    BinOp::And,
                    GoExpr::Raw("!errors.Is(err, io.EOF)".into()),
                ),
                then_body: vec![GoStmt::Return(vec![ident("err")])],
                else_body: None,
            },
            GoStmt::Return(vec![nil()]),
        ],
    }
}

/// Generate one client method.
pub fn codegen_operation(op: &OperationIR, models: &str) -> GoFunc {
    let string = GoType::ident("string");

    // Signature: path params, required query, payload, optional query
    let mut params: Vec<GoParam> = op
        .path_params
        .iter()
        .map(|p| GoParam::new(&p.ident, string.clone()))
        .collect();
    params.extend(
        op.query_params
            .iter()
            .filter(|p| p.required)
            .map(|p| GoParam::new(&p.ident, string.clone())),
    );
    if let Some(request) = &op.request {
        params.push(GoParam::new(
            "payload",
            GoType::Qualified {
                package: models.to_string(),
                name: request.clone(),
            }
            .pointer(),
        ));
    }
    params.extend(
        op.query_params
            .iter()
            .filter(|p| !p.required)
            .map(|p| GoParam::new(&p.ident, string.clone().pointer())),
    );

    let response = op.response.to_go(Some(models));

    let mut body = vec![codegen_path(op)];

    let query_arg = if op.query_params.is_empty() {
        nil()
    } else {
        body.push(GoStmt::Define {
            names: vec!["query".into()],
            value: GoExpr::Composite {
                ty: url_values(),
                fields: vec![],
                multiline: false,
            },
        });
        for param in &op.query_params {
            let set = |value: GoExpr| {
                GoStmt::Expr(
                    ident("query")
                        .select("Set")
                        .call(vec![GoExpr::Str(param.name.clone()), value]),
                )
            };
            if param.required {
                body.push(set(ident(&param.ident)));
            } else {
                body.push(GoStmt::If {
                    init: None,
                    cond: ident(&param.ident).binary(BinOp::NotEqual, nil()),
                    then_body: vec![set(GoExpr::Deref(Box::new(ident(&param.ident))))],
                    else_body: None,
                });
            }
        }
        ident("query")
    };

    let payload_arg = if op.request.is_some() {
        ident("payload")
    } else if op.method.sends_empty_body() {
        GoExpr::Raw("struct{}{}".into())
    } else {
        nil()
    };

    body.push(GoStmt::Blank);
    body.push(GoStmt::Var {
        name: "result".into(),
        ty: response.clone(),
    });
    body.push(check_call(
        ident("c").select("do").call(vec![
            GoExpr::Str(op.method.as_str().into()),
            ident("path"),
            query_arg,
            payload_arg,
            ident("result").addr(),
        ]),
        vec![nil(), ident("err")],
    ));
    body.push(GoStmt::Return(vec![ident("result").addr(), nil()]));

    GoFunc {
        doc: vec![format!("{} calls {}.", op.name, op.label())],
        receiver: client_receiver(),
        name: op.name.clone(),
        params,
        results: vec![response.pointer(), GoType::ident("error")],
        body,
    }
}

/// `path := "..."`, or `fmt.Sprintf` substituting path params in order.
fn codegen_path(op: &OperationIR) -> GoStmt {
    if op.path_params.is_empty() {
        return GoStmt::Define {
            names: vec!["path".into()],
            value: GoExpr::Str(op.path.clone()),
        };
    }

    let mut format = String::new();
    for part in &op.url.parts {
        match part {
            UrlPart::Static(text) => format.push_str(&text.replace('%', "%%")),
            UrlPart::Param(_) => format.push_str("%s"),
        }
    }
    let mut args = vec![GoExpr::Str(format)];
    args.extend(op.path_params.iter().map(|p| ident(&p.ident)));

    GoStmt::Define {
        names: vec!["path".into()],
        value: pkg_call("fmt", "Sprintf", args),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::ir::api::{FieldIR, ParamIR, UrlIR};
    use crate::openapi::ir::emit::Emit;
    use crate::openapi::ir::types::Primitive;
    use crate::openapi::spec::HttpMethod;

    fn param(name: &str, ident: &str, required: bool) -> ParamIR {
        ParamIR {
            name: name.into(),
            ident: ident.into(),
            required,
        }
    }

    fn operation(method: HttpMethod, path: &str) -> OperationIR {
        OperationIR {
            name: "Call".into(),
            method,
            path: path.into(),
            url: UrlIR::parse(path),
            path_params: vec![],
            query_params: vec![],
            request: None,
            response: TypeExpr::Dynamic,
        }
    }

    #[test]
    fn test_operation_signature_order() {
        let mut op = operation(HttpMethod::Post, "/v1/projects/{project_id}/runs");
        op.name = "CreateRun".into();
        op.path_params = vec![param("project_id", "projectId", true)];
        op.query_params = vec![
            param("limit", "limit", false),
            param("status", "status", true),
        ];
        op.request = Some("RunRequest".into());
        op.response = TypeExpr::Named("Run".into());

        let emitted = codegen_operation(&op, "models").emit();
        assert!(emitted.contains(
            "func (c *Client) CreateRun(projectId string, status string, payload *models.RunRequest, limit *string) (*models.Run, error) {"
        ));
        assert!(emitted.contains("\tpath := fmt.Sprintf(\"/v1/projects/%s/runs\", projectId)\n"));
        assert!(emitted.contains("\tquery.Set(\"status\", status)\n"));
        assert!(emitted.contains("\tif limit != nil {\n\t\tquery.Set(\"limit\", *limit)\n\t}\n"));
        assert!(emitted.contains(
            "\tif err := c.do(\"POST\", path, query, payload, &result); err != nil {\n"
        ));
        assert!(emitted.contains("\treturn &result, nil\n"));
    }

    #[test]
    fn test_body_policy_per_verb() {
        let post = codegen_operation(&operation(HttpMethod::Post, "/v1/a"), "models").emit();
        assert!(post.contains("c.do(\"POST\", path, nil, struct{}{}, &result)"));

        let get = codegen_operation(&operation(HttpMethod::Get, "/v1/a"), "models").emit();
        assert!(get.contains("c.do(\"GET\", path, nil, nil, &result)"));
        assert!(get.contains("\tpath := \"/v1/a\"\n"));
        assert!(get.contains("(*any, error)"));
        assert!(get.contains("\tvar result any\n"));

        let delete = codegen_operation(&operation(HttpMethod::Delete, "/v1/a"), "models").emit();
        assert!(delete.contains("c.do(\"DELETE\", path, nil, nil, &result)"));
    }

    #[test]
    fn test_percent_in_path_is_escaped_for_sprintf() {
        let mut op = operation(HttpMethod::Get, "/v1/100%/{id}");
        op.path_params = vec![param("id", "id", true)];
        let emitted = codegen_operation(&op, "models").emit();
        assert!(emitted.contains("fmt.Sprintf(\"/v1/100%%/%s\", id)"));
    }

    #[test]
    fn test_record_file() {
        let def = TypeDefIR {
            name: "Example".into(),
            source: "Example".into(),
            kind: TypeDefKind::Record {
                fields: vec![
                    FieldIR {
                        json_name: "known".into(),
                        ident: "Known".into(),
                        ty: TypeExpr::Primitive(Primitive::String),
                    },
                    FieldIR {
                        json_name: "next".into(),
                        ident: "Next".into(),
                        ty: TypeExpr::Named("Example".into()),
                    },
                ],
            },
        };
        let records = HashSet::from(["Example"]);
        let emitted = codegen_type_def(&def, &records, "models").emit();
        assert_eq!(
            emitted,
            r#"// Code generated by specgen. DO NOT EDIT.

package models

import "encoding/json"

type Example struct {
	Known string   `json:"known,omitempty"`
	Next  *Example `json:"next,omitempty"`

	AdditionalProperties map[string]any `json:"-"`
}

func (m *Example) UnmarshalJSON(data []byte) error {
	type Alias Example
	if err := json.Unmarshal(data, (*Alias)(m)); err != nil {
		return err
	}
	m.AdditionalProperties = make(map[string]any)
	if err := json.Unmarshal(data, &m.AdditionalProperties); err != nil {
		return err
	}
	return nil
}

func (m Example) MarshalJSON() ([]byte, error) {
	type Alias Example
	result := make(map[string]any, len(m.AdditionalProperties))
	for k, v := range m.AdditionalProperties {
		result[k] = v
	}

	declared, err := json.Marshal((*Alias)(&m))
	if err != nil {
		return nil, err
	}
	var fields map[string]json.RawMessage
	if err := json.Unmarshal(declared, &fields); err != nil {
		return nil, err
	}
	for k, v := range fields {
		result[k] = v
	}

	return json.Marshal(result)
}
"#
        );
    }

    #[test]
    fn test_sequence_and_alias_files_have_no_imports() {
        let seq = TypeDefIR {
            name: "Runs".into(),
            source: "Runs".into(),
            kind: TypeDefKind::Sequence(TypeExpr::Named("Run".into())),
        };
        let records = HashSet::new();
        assert_eq!(
            codegen_type_def(&seq, &records, "models").emit(),
            "// Code generated by specgen. DO NOT EDIT.\n\npackage models\n\ntype Runs []Run\n"
        );

        let alias = TypeDefIR {
            name: "Score".into(),
            source: "score".into(),
            kind: TypeDefKind::Alias(TypeExpr::Primitive(Primitive::Float)),
        };
        assert!(
            codegen_type_def(&alias, &records, "models")
                .emit()
                .ends_with("type Score float64\n")
        );
    }

    #[test]
    fn test_client_skips_models_import_when_unused() {
        let api = ApiIR {
            operations: vec![operation(HttpMethod::Get, "/v1/health")],
            types: vec![],
        };
        let emitted = codegen_client(&api, &GeneratorConfig::default()).emit();
        assert!(!emitted.contains("internal/api/models"));
        assert!(emitted.contains("package api\n"));
    }

    #[test]
    fn test_client_runtime_helpers() {
        let mut op = operation(HttpMethod::Get, "/v1/runs");
        op.response = TypeExpr::Named("Run".into());
        let api = ApiIR {
            operations: vec![op],
            types: vec![],
        };
        let mut config = GeneratorConfig::default();
        config.tenant_header = "X-Tenant".into();
        let emitted = codegen_client(&api, &config).emit();

        assert!(emitted.contains("\t\"net/url\"\n\n\t\"github.com/JudgmentLabs/judgeval-go/internal/api/models\"\n)"));
        assert!(emitted.contains("func NewClient(baseURL string, apiKey string, organizationID string) *Client {"));
        assert!(emitted.contains("\t\thttpClient:     &http.Client{},\n"));
        assert!(emitted.contains("\tu, err := url.Parse(c.baseURL + path)\n"));
        assert!(emitted.contains("req.Header.Set(\"Authorization\", \"Bearer \"+c.apiKey)"));
        assert!(emitted.contains("req.Header.Set(\"X-Tenant\", c.organizationID)"));
        assert!(emitted.contains("\tif resp.StatusCode >= 400 {\n"));
        assert!(emitted.contains("return &APIError{StatusCode: resp.StatusCode, Body: string(data)}"));
        assert!(emitted.contains("err != nil && !errors.Is(err, io.EOF)"));
        assert!(emitted.contains("func (c *Client) GetOrganizationID() string {"));
        assert!(emitted.contains("func (e *APIError) Error() string {"));
    }
}
