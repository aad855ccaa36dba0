// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Shared fixtures for the vermut-mutate integration tests.

#![allow(dead_code)]

use vermut_ast::build::{self, *};
use vermut_ast::nodes::{BinaryOp, CollectionKind, Member, Module, Pattern, Stmt, StmtKind, Type};

fn seq_of_int() -> Type {
    Type::Seq(Box::new(Type::Int))
}

fn array_of_int() -> Type {
    Type::Array {
        elem: Box::new(Type::Int),
        dims: 1,
    }
}

/// A small banking module touching every family of operators.
///
/// ```text
/// datatype Color = Red | Green | Blue(level: int)
///
/// class Account {
///   var balance: int
///   var limit: int
///
///   method Deposit(amount: int) returns (total: int) {
///     var fee := 2;
///     var bonus := amount;
///     balance := balance + amount;
///     if fee < bonus { total := fee; } else { total := bonus; }
///     var xs := [1, 2];
///     print xs[0], Double(amount);
///     return total;
///   }
///
///   method Withdraw(limit: int) returns (total: int) {
///     total := this.limit - limit;
///     while total > 0 { total := total - 1; }
///     match Color.Red {
///       case Red => print 1;
///       case Blue(level) => print level;
///       case _ => print 2;
///     }
///     return total;
///   }
///
///   method Double(n: int) returns (r: int) { r := n + n; }
///
///   method Triple(n: int) returns (r: int) {
///     var arr := new int[3];
///     r := n * 3;
///     arr[0] := r;
///   }
/// }
/// ```
pub fn account_module() -> Module {
    let color = datatype(
        "Color",
        vec![
            ("Red", vec![]),
            ("Green", vec![]),
            ("Blue", vec![formal("level", Type::Int, 4)]),
        ],
        1,
        8,
    );

    let members = vec![
        field("balance", Type::Int, 11),
        field("limit", Type::Int, 12),
        Member::Method(deposit()),
        Member::Method(withdraw()),
        Member::Method(double()),
        Member::Method(triple()),
    ];
    module("Bank", vec![color, class("Account", members, 10, 180)])
}

fn deposit() -> vermut_ast::nodes::MethodDecl {
    let int = |name: &str, pos: u32| build::name(name, Type::Int, pos);
    let stmts = vec![
        var_decl("fee", Type::Int, Some(build::int(2, 26)), 24, 27),
        var_decl("bonus", Type::Int, Some(int("amount", 30)), 28, 31),
        assign(
            int("balance", 33),
            binary(BinaryOp::Add, int("balance", 35), int("amount", 37), 36),
            32,
            38,
        ),
        if_stmt(
            binary(BinaryOp::Lt, int("fee", 40), int("bonus", 42), 41),
            block(vec![assign(int("total", 45), int("fee", 47), 44, 48)], 43, 49),
            Some(block_stmt(
                vec![assign(int("total", 52), int("bonus", 54), 51, 55)],
                50,
                56,
            )),
            39,
            57,
        ),
        var_decl(
            "xs",
            seq_of_int(),
            Some(display(
                CollectionKind::Seq,
                vec![build::int(1, 61), build::int(2, 62)],
                Type::Int,
                60,
                63,
            )),
            58,
            64,
        ),
        print(
            vec![
                index(
                    build::name("xs", seq_of_int(), 66),
                    build::int(0, 67),
                    Type::Int,
                    68,
                ),
                call(None, "Double", vec![int("amount", 71)], Type::Int, 70, 72),
            ],
            65,
            73,
        ),
        ret(vec![int("total", 75)], 74, 76),
    ];
    method(
        "Deposit",
        vec![formal("amount", Type::Int, 21)],
        vec![formal("total", Type::Int, 22)],
        block(stmts, 23, 79),
        20,
        80,
    )
}

fn withdraw() -> vermut_ast::nodes::MethodDecl {
    let int = |name: &str, pos: u32| build::name(name, Type::Int, pos);
    let cases = vec![
        case(
            build::ctor_pattern("Red", &[]),
            vec![print(vec![build::int(1, 111)], 110, 112)],
            109,
            113,
        ),
        case(
            build::ctor_pattern("Blue", &[("level", Type::Int)]),
            vec![print(vec![int("level", 116)], 115, 117)],
            114,
            118,
        ),
        case(
            Pattern::Wildcard,
            vec![print(vec![build::int(2, 121)], 120, 122)],
            119,
            123,
        ),
    ];
    let stmts = vec![
        assign(
            int("total", 86),
            binary(
                BinaryOp::Sub,
                member(this("Account", 88), "limit", Type::Int, 89),
                int("limit", 91),
                90,
            ),
            85,
            92,
        ),
        while_stmt(
            binary(BinaryOp::Gt, int("total", 94), build::int(0, 96), 95),
            vec![],
            block(
                vec![assign(
                    int("total", 99),
                    binary(BinaryOp::Sub, int("total", 101), build::int(1, 103), 102),
                    98,
                    104,
                )],
                97,
                105,
            ),
            93,
            106,
        ),
        match_stmt(ctor("Color", "Red", vec![], 108, 108), cases, 107, 125),
        ret(vec![int("total", 127)], 126, 128),
    ];
    method(
        "Withdraw",
        vec![formal("limit", Type::Int, 82)],
        vec![formal("total", Type::Int, 83)],
        block(stmts, 84, 130),
        81,
        131,
    )
}

fn double() -> vermut_ast::nodes::MethodDecl {
    let int = |name: &str, pos: u32| build::name(name, Type::Int, pos);
    let body = block(
        vec![assign(
            int("r", 137),
            binary(BinaryOp::Add, int("n", 139), int("n", 141), 140),
            136,
            142,
        )],
        135,
        143,
    );
    method(
        "Double",
        vec![formal("n", Type::Int, 133)],
        vec![formal("r", Type::Int, 134)],
        body,
        132,
        144,
    )
}

fn triple() -> vermut_ast::nodes::MethodDecl {
    let int = |name: &str, pos: u32| build::name(name, Type::Int, pos);
    let stmts = vec![
        var_decl(
            "arr",
            array_of_int(),
            Some(array_alloc(Type::Int, vec![build::int(3, 153)], None, 151, 154)),
            149,
            155,
        ),
        assign(
            int("r", 157),
            binary(BinaryOp::Mul, int("n", 159), build::int(3, 161), 160),
            156,
            162,
        ),
        assign(
            index(
                build::name("arr", array_of_int(), 164),
                build::int(0, 165),
                Type::Int,
                166,
            ),
            int("r", 168),
            163,
            169,
        ),
    ];
    method(
        "Triple",
        vec![formal("n", Type::Int, 146)],
        vec![formal("r", Type::Int, 147)],
        block(stmts, 148, 170),
        145,
        171,
    )
}

/// Body of method `name` in class `Account`.
pub fn body_of<'m>(module: &'m Module, name: &str) -> &'m [Stmt] {
    module
        .find_method("Account", name)
        .and_then(|m| m.body.as_ref())
        .map(|b| b.stmts.as_slice())
        .unwrap_or_else(|| panic!("no body for Account.{}", name))
}

/// Arguments of a print statement.
pub fn printed(stmt: &Stmt) -> &[vermut_ast::nodes::Expr] {
    match &stmt.kind {
        StmtKind::Print(args) => args,
        other => panic!("expected print, got {:?}", other),
    }
}
