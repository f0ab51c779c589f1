use super::*;

fn hit(sat: Id, sub: Id, file: Id) -> SearchHit {
    SearchHit {
        satellite_id: sat,
        satellite_name: format!("SAT-{sat}"),
        subsystem_id: sub,
        file_id: file,
    }
}

#[test]
fn welcome_line_names_access_level() {
    assert_eq!(welcome_line("ops", false), "Welcome, ops | Access level: Standard");
    assert_eq!(welcome_line("root", true), "Welcome, root | Access level: Administrator");
}

#[test]
fn first_focus_uses_first_hit() {
    assert_eq!(first_focus(&[hit(2, 6, 14), hit(1, 3, 9)]), Some((2, 6)));
}

#[test]
fn first_focus_of_no_hits_is_none() {
    assert_eq!(first_focus(&[]), None);
}
