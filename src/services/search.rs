//! Case-insensitive substring matching for list filters

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

const ESCAPE: char = '\\';

/// `%text%` with LIKE wildcards in `text` escaped, lowercased
pub fn contains_pattern(text: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape(ESCAPE)
}

/// `LOWER(column) LIKE '%text%'`, matching `text` literally
pub fn icontains<C>(column: C, text: &str) -> SimpleExpr
where
    C: IntoColumnRef,
{
    Expr::expr(Func::lower(Expr::col(column))).like(contains_pattern(text))
}
