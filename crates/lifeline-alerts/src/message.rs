use lifeline_types::models::Point;

/// Direct map link for the coordinate.
pub fn maps_view_link(point: Point) -> String {
    format!(
        "https://www.google.com/maps?q={},{}",
        point.latitude, point.longitude
    )
}

/// Turn-by-turn directions link to the coordinate.
pub fn maps_directions_link(point: Point) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        point.latitude, point.longitude
    )
}

/// The single emergency message template used on both alert channels.
pub fn compose_alert(username: &str, location_name: &str, point: Point, in_zone: bool) -> String {
    format!(
        "EMERGENCY ALERT!\n\n\
         {username} has triggered an SOS signal!\n\n\
         Location: {location_name}\n\
         Coordinates: {point}\n\
         Safety Zone Status: {zone}\n\n\
         View location: {view}\n\
         Get directions: {dir}\n\n\
         Please respond immediately!\n\
         Call emergency services if needed.",
        zone = if in_zone { "Inside" } else { "Outside" },
        view = maps_view_link(point),
        dir = maps_directions_link(point),
    )
}

/// Non-emergency location share sent to contacts over the SMS channel.
pub fn compose_location_update(username: &str, location_name: &str, point: Point) -> String {
    format!(
        "Location Update from {username}:\n\
         Current Location: {location_name}\n\
         Coordinates: {point}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_carries_every_field() {
        let msg = compose_alert("asha", "MG Road, Bengaluru", Point::new(12.9716, 77.5946), true);
        assert!(msg.contains("EMERGENCY ALERT!"));
        assert!(msg.contains("asha has triggered an SOS signal!"));
        assert!(msg.contains("Location: MG Road, Bengaluru"));
        assert!(msg.contains("Coordinates: 12.9716, 77.5946"));
        assert!(msg.contains("Safety Zone Status: Inside"));
        assert!(msg.contains("https://www.google.com/maps?q=12.9716,77.5946"));
        assert!(msg.contains("https://www.google.com/maps/dir/?api=1&destination=12.9716,77.5946"));
    }

    #[test]
    fn zone_status_reflects_membership() {
        let msg = compose_alert("asha", "Unknown Location", Point::new(0.0, 0.02), false);
        assert!(msg.contains("Safety Zone Status: Outside"));
    }
}
