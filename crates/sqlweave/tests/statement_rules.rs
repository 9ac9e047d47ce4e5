use sqlweave::prelude::*;
use sqlweave::{ClauseName, ErrorKind};

struct Shop {
    users: Table,
    orders: Table,
    id: Column,
    name: Column,
    email: Column,
    total: Column,
    user_id: Column,
}

fn shop() -> Shop {
    let users = Table::new("users").unwrap();
    let orders = Table::new("orders").unwrap();
    Shop {
        id: users.column("id").unwrap().must_not_update(),
        name: users.column("name").unwrap(),
        email: users.column("email").unwrap(),
        total: orders.column("total").unwrap(),
        user_id: orders.column("user_id").unwrap(),
        users,
        orders,
    }
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn statements_are_send_and_sync() {
    assert_send_sync::<qb::SelectStatement>();
    assert_send_sync::<qb::UpdateStatement>();
    assert_send_sync::<qb::DeleteStatement>();
    assert_send_sync::<qb::InsertStatement>();
}

// ==================== flags ====================

#[test]
fn empty_flags_render_nothing() {
    let s = shop();
    let sql = qb::select()
        .flags(Vec::<Flag>::new())
        .unwrap()
        .columns([&s.id])
        .unwrap()
        .from([&s.users])
        .unwrap()
        .to_sql(&Backend::postgres())
        .unwrap();
    assert_eq!(sql, "SELECT users.id FROM users");
}

#[test]
fn static_flags_end_with_a_space() {
    let s = shop();
    let sql = qb::select()
        .flags([Flag::Distinct])
        .unwrap()
        .columns([&s.id])
        .unwrap()
        .from([&s.users])
        .unwrap()
        .to_sql(&Backend::postgres())
        .unwrap();
    assert_eq!(sql, "SELECT DISTINCT users.id FROM users");
}

#[test]
fn dynamic_flag_follows_static_flags() {
    let s = shop();
    let pg = Backend::postgres();
    let mut stmt = qb::dynamic_select(&pg)
        .dynamic_flags([Flag::Distinct])
        .unwrap()
        .columns([&s.id])
        .unwrap()
        .from([&s.users])
        .unwrap();
    stmt.add_flag(Flag::All).unwrap();
    assert_eq!(
        stmt.to_sql(&pg).unwrap(),
        "SELECT DISTINCT ALL users.id FROM users"
    );
}

#[test]
fn duplicate_static_flags_rejected() {
    let err = qb::select()
        .flags([Flag::Distinct, Flag::Distinct])
        .unwrap_err();
    assert_eq!(err.to_string(), "duplicate DISTINCT detected in select flags");
}

// ==================== dynamic buffers ====================

#[test]
fn dynamic_adds_keep_call_order() {
    let users = Table::new("users").unwrap();
    let columns: Vec<Column> = (0..8)
        .map(|i| users.column(&format!("c{i}")).unwrap())
        .collect();
    let pg = Backend::postgres();

    for split in 0..columns.len() {
        let (fixed, added) = columns.split_at(split);
        let mut stmt = qb::dynamic_update(&pg, &users)
            .dynamic_set(fixed.iter().map(|c| c.to(1)))
            .unwrap()
            .unconditionally()
            .unwrap();
        for col in added {
            stmt.add_assignment(col.to(1)).unwrap();
        }

        let expected: Vec<String> = columns.iter().map(|c| format!("{}=1", c.name())).collect();
        assert_eq!(
            stmt.to_sql(&pg).unwrap(),
            format!("UPDATE users SET {}", expected.join(","))
        );
    }
}

#[test]
fn static_set_plus_dynamic_add() {
    let t = Table::new("t").unwrap();
    let a = t.column("a").unwrap();
    let b = t.column("b").unwrap();
    let c = t.column("c").unwrap();

    let err = qb::update(&t)
        .set([a.to(1), b.to(2)])
        .unwrap()
        .dynamic_set([c.to(3)])
        .unwrap_err();
    assert!(matches!(err, BuildError::ClauseAlreadySet { .. }));

    let err = qb::update(&t).dynamic_set([a.to(1), b.to(2)]).unwrap_err();
    assert_eq!(
        err,
        BuildError::StaticStatement {
            method: "dynamic_set"
        }
    );
    assert_eq!(err.kind(), ErrorKind::Usage);

    let pg = Backend::postgres();
    let mut stmt = qb::dynamic_update(&pg, &t)
        .dynamic_set([a.to(1), b.to(2)])
        .unwrap()
        .unconditionally()
        .unwrap();
    stmt.add_assignment(c.to(3)).unwrap();
    assert_eq!(stmt.to_sql(&pg).unwrap(), "UPDATE t SET a=1,b=2,c=3");
}

// ==================== assignment rules ====================

#[test]
fn repeated_column_rejected_without_state_change() {
    let s = shop();
    let err = qb::update(&s.users)
        .set([s.name.to("a"), s.name.to("b")])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "column users.name assigned more than once in update assignments"
    );

    let pg = Backend::postgres();
    let mut stmt = qb::dynamic_update(&pg, &s.users)
        .dynamic_set([s.name.to("a")])
        .unwrap()
        .filter(s.id.eq(1))
        .unwrap();
    let before = stmt.to_sql(&pg).unwrap();

    let err = stmt.add_assignment(s.name.to("b")).unwrap_err();
    assert!(matches!(err, BuildError::DuplicateColumn { .. }));
    let err = stmt.add_assignment_ntc(s.name.to("c")).unwrap_err();
    assert!(matches!(err, BuildError::DuplicateColumn { .. }));
    assert_eq!(stmt.to_sql(&pg).unwrap(), before);

    stmt.add_assignment(s.email.to("x@example.com")).unwrap();
    let err = stmt
        .add_assignments([s.email.to("y@example.com")])
        .unwrap_err();
    assert!(matches!(err, BuildError::DuplicateColumn { .. }));
}

#[test]
fn cross_table_assignments_rejected() {
    let s = shop();
    let err = qb::update(&s.users)
        .from([&s.orders])
        .unwrap()
        .set([s.name.to("a"), s.total.to(0)])
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::MultipleTables {
            clause: ClauseName::Assignments,
            tables: vec!["orders".to_string(), "users".to_string()],
        }
    );

    // Each add is single-table on its own; the second one would make the
    // statement span two tables.
    let pg = Backend::postgres();
    let mut stmt = qb::dynamic_update(&pg, &s.users)
        .from([&s.orders])
        .unwrap()
        .dynamic_set([s.name.to("a")])
        .unwrap()
        .filter(s.user_id.eq(&s.id))
        .unwrap();
    let before = stmt.to_sql(&pg).unwrap();
    let err = stmt.add_assignment(s.total.to(0)).unwrap_err();
    assert!(matches!(err, BuildError::MultipleTables { .. }));
    assert_eq!(stmt.to_sql(&pg).unwrap(), before);
}

#[test]
fn assignment_values_may_read_other_tables() {
    let s = shop();
    let sql = qb::update(&s.users)
        .set([s.name.to(&s.total)])
        .unwrap()
        .from([&s.orders])
        .unwrap()
        .filter(s.user_id.eq(&s.id))
        .unwrap()
        .to_sql(&Backend::sqlite())
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE users SET name=orders.total FROM orders WHERE orders.user_id=users.id"
    );
}

#[test]
fn required_insert_columns_on_every_path() {
    let users = Table::new("users").unwrap().require_insert("name").unwrap();
    let name = users.column("name").unwrap();
    let email = users.column("email").unwrap();
    let missing = BuildError::MissingRequiredColumns {
        clause: ClauseName::InsertValues,
        columns: vec!["name".to_string()],
    };

    assert_eq!(qb::insert_into(&users).set([email.to("x")]).unwrap_err(), missing);
    assert_eq!(qb::insert_into(&users).default_values().unwrap_err(), missing);

    let pg = Backend::postgres();
    let mut stmt = qb::dynamic_insert_into(&pg, &users)
        .dynamic_set([email.to("x")])
        .unwrap();
    assert_eq!(stmt.to_sql(&pg).unwrap_err(), missing);
    stmt.add_assignment(name.to("ann")).unwrap();
    assert_eq!(
        stmt.to_sql(&pg).unwrap(),
        "INSERT INTO users (email,name) VALUES ('x','ann')"
    );
}

#[test]
fn failed_builder_call_keeps_the_statement() {
    let s = shop();
    let stmt = qb::update(&s.users).set([s.name.to("a")]).unwrap();

    let err = stmt.set([s.id.to(1)]).unwrap_err();
    assert!(matches!(err, BuildError::ClauseAlreadySet { .. }));
    let err = stmt.filter(s.total.gt(0)).unwrap().to_sql(&Backend::postgres()).unwrap_err();
    assert!(matches!(err, BuildError::UnknownTables { .. }));
    let err = stmt.from([&s.users]).unwrap_err();
    assert!(matches!(err, BuildError::DuplicateFragment { .. }));

    let sql = stmt
        .filter(s.id.eq(1))
        .unwrap()
        .to_sql(&Backend::postgres())
        .unwrap();
    assert_eq!(sql, "UPDATE users SET name='a' WHERE users.id=1");
}

// ==================== floats ====================

#[test]
fn non_finite_floats_per_backend() {
    let t = Table::new("t").unwrap();
    let a = t.column("a").unwrap();
    let pg = Backend::postgres();

    for (value, literal) in [
        (f64::NAN, "'NaN'::float8"),
        (f64::INFINITY, "'Infinity'::float8"),
        (f64::NEG_INFINITY, "'-Infinity'::float8"),
    ] {
        let stmt = qb::update(&t)
            .set([a.to(value)])
            .unwrap()
            .unconditionally()
            .unwrap();
        assert_eq!(stmt.to_sql(&pg).unwrap(), format!("UPDATE t SET a={literal}"));

        for backend in [Backend::sqlite(), Backend::mysql()] {
            let err = stmt.to_sql(&backend).unwrap_err();
            assert!(matches!(
                err,
                BuildError::Unsupported {
                    construct: "non-finite float literal",
                    ..
                }
            ));
        }

        let err = qb::dynamic_update(&Backend::sqlite(), &t)
            .dynamic_set([a.to(value)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Semantic);
    }
}

#[test]
fn f32_values_render_without_widening_noise() {
    let t = Table::new("t").unwrap();
    let a = t.column("a").unwrap();
    let sql = qb::insert_into(&t)
        .set([a.to(0.1f32)])
        .unwrap()
        .to_sql(&Backend::sqlite())
        .unwrap();
    assert_eq!(sql, "INSERT INTO t (a) VALUES (0.1)");
}

// ==================== consistency ====================

#[test]
fn update_without_assignments_is_inconsistent_but_buildable() {
    let s = shop();
    let stmt = qb::update(&s.users).filter(s.id.eq(1)).unwrap();
    assert!(!stmt.is_consistent());
    let err = stmt.check_consistency().unwrap_err();
    assert_eq!(err.to_string(), "update assignments required, e.g. set(...)");
    assert!(err.is_incomplete());

    let stmt = stmt.set([s.name.to("bob")]).unwrap();
    assert!(stmt.is_consistent());
    assert_eq!(
        stmt.to_sql(&Backend::postgres()).unwrap(),
        "UPDATE users SET name='bob' WHERE users.id=1"
    );
}

#[test]
fn consistency_reports_first_missing_clause() {
    let s = shop();
    let err = qb::update(&s.users).check_consistency().unwrap_err();
    assert!(matches!(
        err,
        BuildError::MissingClause {
            clause: ClauseName::Assignments,
            ..
        }
    ));

    let err = qb::update(&s.users)
        .set([s.name.to("x")])
        .unwrap()
        .check_consistency()
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::MissingClause {
            clause: ClauseName::Where,
            ..
        }
    ));
}

// ==================== rendering ====================

#[test]
fn rendering_is_idempotent() {
    let s = shop();
    let pg = Backend::postgres();
    let config = RenderConfig::new().parameterize_literals();
    let stmt = qb::select()
        .columns([&s.name, &s.total])
        .unwrap()
        .from([FromItem::from(&s.users), left_join(&s.orders, s.user_id.eq(&s.id))])
        .unwrap()
        .filter(Expr::or(vec![s.total.gt(100), s.name.like("vip%")]))
        .unwrap()
        .order_by([s.total.desc()])
        .unwrap()
        .limit(5)
        .unwrap();

    let first = stmt.build_with(&pg, &config).unwrap();
    let second = stmt.build_with(&pg, &config).unwrap();
    assert_eq!(first.sql, second.sql);
    assert_eq!(first.params.len(), second.params.len());
    assert_eq!(
        first.sql,
        "SELECT users.name,orders.total FROM users LEFT OUTER JOIN orders ON orders.user_id=users.id \
         WHERE (orders.total>$1 OR users.name LIKE $2) ORDER BY orders.total DESC LIMIT 5"
    );
}

#[test]
fn clones_branch_independently() {
    let s = shop();
    let pg = Backend::postgres();
    let base = qb::dynamic_select(&pg)
        .columns([&s.id])
        .unwrap()
        .from([&s.users])
        .unwrap()
        .dynamic_filter(None)
        .unwrap();

    let mut branch = base.clone();
    branch.add_filter(s.name.eq("alice")).unwrap();

    assert_eq!(base.to_sql(&pg).unwrap(), "SELECT users.id FROM users");
    assert_eq!(
        branch.to_sql(&pg).unwrap(),
        "SELECT users.id FROM users WHERE users.name='alice'"
    );
}

#[test]
fn json_and_null_values() {
    let s = shop();
    let profile = serde_json::json!({ "theme": "dark" });
    let sql = qb::insert_into(&s.users)
        .set([
            s.name.to_json(&profile).unwrap(),
            s.email.to(None::<String>),
        ])
        .unwrap()
        .to_sql(&Backend::postgres())
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO users (name,email) VALUES ('{"theme":"dark"}',NULL)"#
    );
}
