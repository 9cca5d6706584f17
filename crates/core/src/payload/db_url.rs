//! Connection URL for database GUIs that accept a single `scheme://conn.*` argument.

use crate::descriptor::Protocol;

pub const DEFAULT_SCHEME: &str = "navicat";
const ESCAPED: &[char] = &['^', '(', ')', '{', '}', '~'];

pub struct DbUrlFields<'a> {
    pub protocol: &'a Protocol,
    pub host: &'a str,
    /// Connection name: display-name suffix after the last `@`, else the username.
    pub name: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub database: &'a str,
}

pub fn build(scheme: &str, f: &DbUrlFields<'_>) -> String {
    let kind = match f.protocol {
        Protocol::Oracle => "ora",
        Protocol::SqlServer => "mssql",
        Protocol::PostgreSql => "pgsql",
        other => other.as_str(),
    };
    let mut url = format!(
        "{scheme}://conn.{kind}?Conn.Host={}&Conn.Name={}&Conn.Port={}&Conn.Username={}",
        f.host, f.name, f.port, f.username
    );
    match f.protocol {
        Protocol::Oracle => url.push_str(&format!(
            "&Conn.ServiceName={}&Conn.ServiceNameType=ServiceName&Conn.ConnectionMode=Basic",
            f.database
        )),
        Protocol::SqlServer => url.push_str(&format!(
            "&Conn.AuthenticationType=Default&Conn.InitialDatabase={}",
            f.database
        )),
        Protocol::PostgreSql => url.push_str(&format!("&Conn.InitialDatabase={}", f.database)),
        _ => {}
    }
    escape(&url)
}

/// Wraps each of `^(){}~` in braces. Single pass over the input, so the
/// braces it adds are never wrapped again.
pub fn escape(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        if ESCAPED.contains(&c) {
            out.push('{');
            out.push(c);
            out.push('}');
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a>(protocol: &'a Protocol, database: &'a str) -> DbUrlFields<'a> {
        DbUrlFields { protocol, host: "db1", name: "prod", port: 1521, username: "scott", database }
    }

    #[test]
    fn oracle_uses_ora_scheme_and_service_name() {
        let url = build(DEFAULT_SCHEME, &fields(&Protocol::Oracle, "scott"));
        assert!(url.starts_with("navicat://conn.ora?Conn.Host=db1&Conn.Name=prod&Conn.Port=1521"));
        assert!(url.contains("&Conn.ServiceName=scott&"));
        assert!(url.ends_with("Conn.ConnectionMode=Basic"));
    }

    #[test]
    fn sqlserver_and_postgres_carry_initial_database() {
        let mssql = build(DEFAULT_SCHEME, &fields(&Protocol::SqlServer, "sales"));
        assert!(mssql.contains("://conn.mssql?"));
        assert!(mssql.ends_with("&Conn.AuthenticationType=Default&Conn.InitialDatabase=sales"));

        let pg = build(DEFAULT_SCHEME, &fields(&Protocol::PostgreSql, "app"));
        assert!(pg.contains("://conn.pgsql?"));
        assert!(pg.ends_with("&Conn.InitialDatabase=app"));
    }

    #[test]
    fn other_engines_keep_their_name_and_no_suffix() {
        let url = build("dbtool", &fields(&Protocol::MySql, "ignored"));
        assert_eq!(
            url,
            "dbtool://conn.mysql?Conn.Host=db1&Conn.Name=prod&Conn.Port=1521&Conn.Username=scott"
        );
    }

    #[test]
    fn escaping_runs_after_suffixes_are_appended() {
        let url = build(DEFAULT_SCHEME, &fields(&Protocol::PostgreSql, "a~b"));
        assert!(url.ends_with("Conn.InitialDatabase=a{~}b"));
    }

    #[test]
    fn escape_wraps_every_special_character_once() {
        assert_eq!(escape("a(b)c"), "a{(}b{)}c");
        assert_eq!(escape("{^}"), "{{}{^}{}}");
        let input = "x^y~z{}";
        assert_eq!(escape(input).len(), input.len() + 2 * 4);
        assert_eq!(escape("plain"), "plain");
    }
}
