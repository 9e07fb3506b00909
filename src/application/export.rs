//! CSV export of the booking dashboard

use std::collections::HashMap;

use crate::domain::{Booking, Room};

pub const CSV_HEADER: &str = "ID,Cliente,Email,Habitacion,Entrada,Salida,Total,Metodo,Estado";

/// Render `bookings` in the given order. `Habitacion` is the room name,
/// or the room id when the room is gone.
pub fn bookings_to_csv(bookings: &[Booking], rooms: &[Room]) -> String {
    let names: HashMap<i32, &str> = rooms.iter().map(|r| (r.id, r.name.as_str())).collect();

    let mut out = String::with_capacity(64 * (bookings.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for b in bookings {
        let room = names
            .get(&b.room_id)
            .map(|n| n.to_string())
            .unwrap_or_else(|| b.room_id.to_string());
        let fields = [
            b.id.to_string(),
            b.client_name.clone(),
            b.client_email.clone(),
            room,
            b.check_in.format("%Y-%m-%d").to_string(),
            b.check_out.format("%Y-%m-%d").to_string(),
            b.total_price.to_string(),
            b.payment_method.clone().unwrap_or_default(),
            b.status.as_str().to_string(),
        ];
        let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
