//! End-to-end lowering scenarios.
//!
//! Each test builds a compilation unit the way a host parser would hand it over, lowers it and inspects either the
//! emitted tokens or the reported errors.

use quote::quote;
use sable::annotations::{AnnotationPass, MemberSelector, ProgramEntity};
use sable::ast::{AstBuilder, CompilationUnit, Expr, Span, Spanned, Stmt};
use sable::backend::{Lowering, RecordingSink};
use sable::diagnostics::ErrorKind;
use sable::symbols::{DeclarationLookup, SymbolTable, TypeDecl};
use sable::frontend::types::ResolvedType;
use sable_core::lang::types::NumericTypeId;

fn symbols() -> SymbolTable {
    SymbolTable::new()
        .with(TypeDecl::attribute(
            "ObsoleteAttribute",
            vec![vec![], vec![ResolvedType::String]],
        ))
        .with(TypeDecl::attribute("TransactionAttribute", vec![]))
        .with(TypeDecl::class("Config").property("path", ResolvedType::String))
        .with(TypeDecl::class("User").method("save", ResolvedType::Bool))
        .with(TypeDecl::interface("ISomeInterface"))
        .with(TypeDecl::class("Widget").implements("ISomeInterface"))
        .with(
            TypeDecl::structure("Pixel")
                .field("rgb", ResolvedType::Numeric(NumericTypeId::Int))
                .field("alpha", ResolvedType::Numeric(NumericTypeId::Byte)),
        )
}

fn declarations(stmts: Vec<Spanned<Stmt>>) -> CompilationUnit {
    CompilationUnit {
        declarations: stmts,
        functions: vec![],
    }
}

/// `select(ty).typeTarget.add(attr, args..)`
fn type_chain(b: &mut AstBuilder, ty: &str, attr: &str, args: Vec<Spanned<Expr>>) -> Spanned<Stmt> {
    let ty = b.ident(ty);
    let root = b.call_named("select", vec![], vec![ty]);
    let target = b.member(root, "typeTarget");
    let mut all = vec![b.ident(attr)];
    all.extend(args);
    let chain = b.method_call(target, "add", all);
    b.expr_stmt(chain)
}

#[test]
fn obsolete_with_message_lowers_to_single_tag() {
    let symbols = symbols();
    let mut b = AstBuilder::new();
    let msg = b.string("msg");
    let unit = declarations(vec![type_chain(&mut b, "Config", "ObsoleteAttribute", vec![msg])]);

    let lowered = Lowering::new(&symbols).lower(&unit).expect("lowering failed");
    let config = ProgramEntity::Type(symbols.type_handle("Config").expect("Config declared"));

    assert_eq!(
        lowered.emitter().annotations(&config).unwrap().to_string(),
        quote!([Obsolete("msg")]).to_string()
    );
    let descriptor = lowered.annotations.for_entity(&config).next().expect("one attachment");
    assert_eq!(descriptor.matched_signature().to_string(), "(string)");
    assert!(lowered.emitter().unit(&unit).expect("emission failed").is_empty());
}

#[test]
fn obsolete_with_three_ints_has_no_matching_overload() {
    let symbols = symbols();
    let mut b = AstBuilder::new();
    let (one, two, three) = (b.int(1), b.int(2), b.int(3));
    let unit = declarations(vec![type_chain(&mut b, "Config", "ObsoleteAttribute", vec![one, two, three])]);

    let mut sink = RecordingSink::new();
    let errors = Lowering::new(&symbols)
        .lower_unit(&unit, &mut sink)
        .expect_err("three ints match no signature");
    let err = errors.first().expect("one error");

    assert_eq!(err.kind, ErrorKind::NoMatchingOverload);
    let listed = format!("{} {}", err.message, err.notes.join(" "));
    assert!(listed.contains("ObsoleteAttribute"), "{listed}");
    assert!(listed.contains("()"), "{listed}");
    assert!(listed.contains("(string)"), "{listed}");
    assert!(listed.contains("int, int, int"), "{listed}");
    assert_eq!(sink.tags().count(), 0);
}

#[test]
fn transaction_on_user_save_method() {
    let symbols = symbols();
    let mut b = AstBuilder::new();
    let user = b.ident("User");
    let root = b.call_named("select", vec![], vec![user]);
    let selector = b.selector("u", "save");
    let target = b.method_call(root, "method", vec![selector]);
    let attr = b.ident("TransactionAttribute");
    let chain = b.method_call(target, "add", vec![attr]);
    let unit = declarations(vec![b.expr_stmt(chain)]);

    let lowered = Lowering::new(&symbols).lower(&unit).expect("lowering failed");
    let attachment = &lowered.annotations.attachments()[0];

    assert_eq!(
        attachment.entity,
        ProgramEntity::Method {
            owner: symbols.type_handle("User").expect("User declared"),
            name: "save".to_string(),
        }
    );
    assert!(attachment.descriptor.args().is_empty());
    assert_eq!(
        lowered.emitter().annotations(&attachment.entity).unwrap().to_string(),
        quote!([Transaction]).to_string()
    );
}

#[test]
fn property_selector_on_callable_member_is_unresolved() {
    let symbols = symbols();
    let mut pass = AnnotationPass::new(&symbols);
    let user = symbols.type_handle("User").expect("User declared");

    let err = pass
        .select(user)
        .property(&MemberSelector::named("save", Span::default()))
        .err()
        .expect("save is a method");
    assert_eq!(err.kind, ErrorKind::UnresolvedMember);
    assert!(pass.finish().is_empty());
}

#[test]
fn sizeof_fixed_layout_and_reference_type() {
    let symbols = symbols();
    let mut b = AstBuilder::new();

    let pixel = b.ty("Pixel");
    let size = b.call_named("sizeof", vec![pixel], vec![]);
    let fixed = b.let_stmt("size", size);
    let unit = declarations(vec![fixed]);
    let lowered = Lowering::new(&symbols).lower(&unit).expect("Pixel has a fixed layout");
    assert_eq!(
        lowered.emitter().unit(&unit).expect("emission failed").to_string(),
        quote!(var size = sizeof(Pixel);).to_string()
    );

    let config = b.ty("Config");
    let size = b.call_named("sizeof", vec![config], vec![]);
    let reference = b.let_stmt("size", size);
    let errors = Lowering::new(&symbols)
        .lower(&declarations(vec![reference]))
        .expect_err("Config is a reference type");
    assert_eq!(errors.first().map(|e| e.kind), Some(ErrorKind::UnlowerableIntrinsic));
    assert!(errors.to_string().contains("sizeof"));
}

#[test]
fn interface_view_emits_no_cast() {
    let symbols = symbols();
    let mut b = AstBuilder::new();
    let iface = b.ty("ISomeInterface");
    let value = b.ident("value");
    let view = b.call_named("asinterface", vec![iface], vec![value]);
    let ret = b.ty("ISomeInterface");
    let widget = b.ty("Widget");
    let body = vec![b.return_stmt(Some(view))];
    let func = b.function("view", vec![("value", widget)], ret, body);
    let unit = CompilationUnit {
        declarations: vec![],
        functions: vec![func],
    };

    let lowered = Lowering::new(&symbols).lower(&unit).expect("lowering failed");
    let emitted = lowered.emitter().unit(&unit).expect("emission failed").to_string();
    assert_eq!(
        emitted,
        quote!(static ISomeInterface view(Widget value) { return value; }).to_string()
    );
    assert!(!emitted.contains(" as "));
}

#[test]
fn receiver_marker_lowers_to_extension_receiver() {
    let symbols = symbols();
    let mut b = AstBuilder::new();
    let inner = b.ty("string");
    let receiver = b.generic_ty("thisarg", vec![inner]);
    let ret = b.ty("string");
    let s = b.ident("s");
    let name = b.call_named("nameof", vec![], vec![s]);
    let body = vec![b.return_stmt(Some(name))];
    let func = b.function("label", vec![("s", receiver)], ret, body);
    let unit = CompilationUnit {
        declarations: vec![],
        functions: vec![func],
    };

    let lowered = Lowering::new(&symbols).lower(&unit).expect("lowering failed");
    assert_eq!(
        lowered.emitter().unit(&unit).expect("emission failed").to_string(),
        quote!(static string label(this string s) { return nameof(s); }).to_string()
    );
}

#[test]
fn unrelated_constructs_keep_being_checked() {
    let symbols = symbols();
    let mut b = AstBuilder::new();
    let (one, two, three) = (b.int(1), b.int(2), b.int(3));
    let bad_overload = type_chain(&mut b, "Config", "ObsoleteAttribute", vec![one, two, three]);
    let missing = type_chain(&mut b, "Nowhere", "TransactionAttribute", vec![]);
    let ok = type_chain(&mut b, "User", "TransactionAttribute", vec![]);
    let lit = b.int(4);
    let name = b.call_named("nameof", vec![], vec![lit]);
    let bad_nameof = b.let_stmt("n", name);

    let errors = Lowering::new(&symbols)
        .lower(&declarations(vec![bad_overload, missing, ok, bad_nameof]))
        .expect_err("three statements are invalid");
    let kinds: Vec<ErrorKind> = errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ErrorKind::NoMatchingOverload,
            ErrorKind::UnknownType,
            ErrorKind::UnlowerableIntrinsic,
        ]
    );
    assert!(!errors.has_internal());
}

#[test]
fn stack_buffer_local_is_typed_as_span() {
    let symbols = symbols();
    let mut b = AstBuilder::new();
    let byte = b.ty("byte");
    let count = b.int(16);
    let alloc = b.call_named("stackalloc", vec![byte], vec![count]);
    let buffer = b.let_stmt("buffer", alloc);
    let ret = b.ty("int");
    let zero = b.int(0);
    let body = vec![buffer, b.return_stmt(Some(zero))];
    let func = b.function("fill", vec![], ret, body);
    let unit = CompilationUnit {
        declarations: vec![],
        functions: vec![func],
    };

    let lowered = Lowering::new(&symbols).lower(&unit).expect("lowering failed");
    let emitted = lowered.emitter().unit(&unit).expect("emission failed").to_string();
    assert_eq!(
        emitted,
        quote!(static int fill() { Span<byte> buffer = stackalloc byte[16]; return 0; }).to_string()
    );
    assert!(!emitted.contains("var"));
}

#[test]
fn nested_receiver_marker_never_reaches_emission() {
    let symbols = symbols();
    let mut b = AstBuilder::new();
    let inner = b.ty("string");
    let marker = b.generic_ty("thisarg", vec![inner]);
    let list = b.generic_ty("List", vec![marker]);
    let ret = b.ty("int");
    let zero = b.int(0);
    let body = vec![b.return_stmt(Some(zero))];
    let func = b.function("count", vec![("items", list)], ret, body);
    let unit = CompilationUnit {
        declarations: vec![],
        functions: vec![func],
    };

    let errors = Lowering::new(&symbols).lower(&unit).expect_err("nested marker is misplaced");
    assert_eq!(errors.first().map(|e| e.kind), Some(ErrorKind::UnlowerableIntrinsic));
    assert!(!errors.has_internal());
}

#[test]
fn dollar_identifier_reports_instead_of_panicking() {
    let symbols = symbols();
    let mut b = AstBuilder::new();
    let scope = b.ident("$scope");
    let name = b.call_named("nameof", vec![], vec![scope]);
    let label = b.let_stmt("label", name);

    let errors = Lowering::new(&symbols)
        .lower(&declarations(vec![label]))
        .expect_err("`$scope` is not a target identifier");
    assert_eq!(errors.first().map(|e| e.kind), Some(ErrorKind::InvalidTargetName));
}
