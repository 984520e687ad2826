use asupersync::runtime::RuntimeBuilder;
use asupersync::{Cx, Outcome};

use blueprint::prelude::*;

fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

#[test]
fn dry_run_create_table_captures_expected_ddl() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        set_dialect(Dialect::Postgres);
        let builder = new_builder("").expect("resolve builder for configured dialect");
        let ctx = new_dry_run_context();

        unwrap_outcome(
            builder
                .create(&cx, &ctx, "widgets", |bp| {
                    bp.id();
                    bp.string("name");
                    bp.timestamps();
                })
                .await,
        );

        let captured = ctx.captured_sql();
        assert_eq!(captured.len(), 1);
        assert!(captured[0].sql.starts_with("CREATE TABLE widgets"));
        assert!(captured[0].sql.contains("name VARCHAR(255) NOT NULL"));
    });
}

#[test]
fn has_table_on_fresh_dry_run_context_is_false() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let builder = Builder::new(Dialect::SQLite).expect("resolve sqlite builder");
        let ctx = new_dry_run_context();

        let found = unwrap_outcome(builder.has_table(&cx, &ctx, "widgets").await);
        assert!(!found);
    });
}
