use std::collections::HashMap;

use tessera_core::{query, Query, StatementKind};

fn main() {
    println!("=== Tessera Core - Basic Usage Examples ===\n");

    // SELECT across two tables with a join
    let mut select = query();
    select.add_table("projects", "p");
    select.add_table("companies", "c");
    select.add_query(vec!["p.project_id", "p.project_name", "c.company_name"]);
    select.add_join("users", "u", "u.user_id = p.project_owner", "inner");
    select.add_where("c.company_id = p.project_company");
    select.add_where("p.project_active = 1");
    select.add_order("p.project_name");
    select.set_limit(20);

    println!("1. SELECT:");
    println!("   SQL: {}\n", select.prepare_select());

    // INSERT with quoted values and a function token
    let mut insert = query();
    insert.add_table("tasks", "");
    insert.add_insert("task_name", "Write the release notes");
    insert.add_insert("task_priority", 2);
    insert.add_insert_raw("task_created", &insert.dbfn_now());

    println!("2. INSERT:");
    println!("   SQL: {}\n", insert.prepare_insert());

    // UPDATE using a date expression
    let mut update = query();
    update.add_table("tasks", "");
    update.add_update_raw("task_end_date", &update.dbfn_date_add("task_start_date", 14, "DAY"));
    update.add_where("task_id = 42");

    println!("3. UPDATE:");
    println!("   SQL: {}\n", update.prepare_update());

    // DELETE, clearing the query so it can be reused
    let mut config = HashMap::new();
    config.insert("dbprefix".to_string(), "w2p_".to_string());
    let mut delete = Query::new("", &config, ());
    let sessions = delete.prefixed("sessions");
    delete.add_table(&sessions, "");
    delete.add_where(format!("session_updated < {}", delete.dbfn_date_add("", -30, "DAY")));
    delete.set_limit(500);

    println!("4. DELETE:");
    println!("   SQL: {}", delete.prepare_and_clear(StatementKind::Delete));
    println!("   Cleared: {:?}", delete.state().tables.is_empty());
}
