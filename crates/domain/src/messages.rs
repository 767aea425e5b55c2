use crate::reminder::ReminderTier;

/// Everything the confirmation template needs, already formatted for
/// the customer's locale by the caller.
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub customer_name: String,
    pub service_name: String,
    pub date: String,
    pub time: String,
    pub number_of_people: u16,
    pub guest_names: Vec<String>,
    pub deposit: Option<i64>,
    pub deposit_percentage: i64,
}

/// Booking confirmation text sent right after the calendar event is
/// created.
pub fn confirmation_message(details: &BookingDetails) -> String {
    let mut message = String::from("*Confirmación de Cita - Lotus Spa*\n\n");
    message.push_str(&format!("Hola {}!\n\n", details.customer_name));
    message.push_str("Hemos recibido tu solicitud de cita:\n\n");
    message.push_str(&format!("*Fecha:* {}\n", details.date));
    message.push_str(&format!("*Hora:* {}\n", details.time));
    message.push_str(&format!("*Servicio:* {}\n", details.service_name));
    message.push_str(&format!("*Personas:* {}\n", details.number_of_people));

    if !details.guest_names.is_empty() {
        message.push_str("\n*Invitados:*\n");
        for (index, name) in details.guest_names.iter().enumerate() {
            message.push_str(&format!("  {}. {}\n", index + 1, name));
        }
    }

    if let Some(deposit) = details.deposit {
        message.push_str(&format!(
            "\n*Depósito requerido ({}%):* ${}\n",
            details.deposit_percentage, deposit
        ));
    }

    message.push_str("\n*¿Confirmas esta cita?*\n\nResponde SI o NO");
    message
}

/// Tier specific reminder text. `customer_name` is whatever the
/// contact codec could recover, so it may be absent.
pub fn reminder_message(
    tier: ReminderTier,
    customer_name: Option<&str>,
    service_name: &str,
    date: &str,
    time: &str,
) -> String {
    let name = customer_name.unwrap_or("Cliente");

    if let ReminderTier::Min5 = tier {
        return format!(
            "Hola {}!\n\nTe recordamos que tienes tu cita de {} en 5 minutos.\n\n*Hora:* {}\n\n¡Te esperamos!",
            name, service_name, time
        );
    }

    let mut message = String::from("*Recordatorio de Cita - Lotus Spa*\n\n");
    message.push_str(&format!("Hola {}!\n\n", name));
    match tier {
        ReminderTier::H24 => message.push_str("Te recordamos que tu cita es *mañana*:\n\n"),
        ReminderTier::H1 => message.push_str("Tu cita es *en 1 hora*:\n\n"),
        ReminderTier::Min5 => unreachable!(),
    }
    message.push_str(&format!("*Fecha:* {}\n", date));
    message.push_str(&format!("*Hora:* {}\n", time));
    message.push_str(&format!("*Servicio:* {}\n\n", service_name));
    message.push_str("*¿Confirmas tu asistencia?*\n\nResponde CONFIRMO o CANCELO");
    message
}
