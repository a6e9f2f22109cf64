use crate::prelude::{
    DecodeError, Reading, ANGLE_OFFSET, RAW_ANGLE_MAX, RAW_ANGLE_MIN,
};

/// Distance field value sent when the sensor heard no echo.
pub const NO_ECHO: &str = "-";
const FIELD_SEPARATOR: char = ',';

/// Decodes one raw line (terminator optional) from the sensor.
pub fn parse_bytes(raw: &[u8]) -> Result<Reading, DecodeError> {
    let line = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8)?;
    parse(line)
}

/// Decodes `"<angle>,<distance|->"` into a re-centred [`Reading`].
pub fn parse(line: &str) -> Result<Reading, DecodeError> {
    let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();
    let [angle_field, distance_field] = fields.as_slice() else {
        return Err(DecodeError::FieldCount(fields.len()));
    };

    let angle = parse_angle(angle_field.trim())?;
    let distance = parse_distance(distance_field.trim())?;
    Ok(Reading { angle, distance })
}

fn parse_angle(field: &str) -> Result<i32, DecodeError> {
    let raw: i32 = field
        .parse()
        .map_err(|_| DecodeError::InvalidAngle(field.to_string()))?;
    if !(RAW_ANGLE_MIN..=RAW_ANGLE_MAX).contains(&raw) {
        return Err(DecodeError::AngleOutOfRange(raw));
    }
    Ok(raw - ANGLE_OFFSET)
}

fn parse_distance(field: &str) -> Result<Option<u32>, DecodeError> {
    if field == NO_ECHO {
        return Ok(None);
    }
    field
        .parse::<u32>()
        .map(Some)
        .map_err(|_| DecodeError::InvalidDistance(field.to_string()))
}

/// Encodes a reading in the sensor's wire format, newline included.
pub fn encode(reading: &Reading) -> String {
    let raw_angle = reading.angle + ANGLE_OFFSET;
    match reading.distance {
        Some(distance) => format!("{raw_angle},{distance}\n"),
        None => format!("{raw_angle},{NO_ECHO}\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_lines_are_recentred() {
        for raw in [0, 45, 90, 135, 180] {
            for distance in [0u32, 7, 30, 400] {
                let reading = parse(&format!("{raw},{distance}\n")).unwrap();
                assert_eq!(reading.angle, raw - 90);
                assert_eq!(reading.distance, Some(distance));
            }
        }
    }

    #[test]
    fn dash_means_no_echo() {
        let reading = parse("95,-").unwrap();
        assert_eq!(reading, Reading::no_echo(5));
    }

    #[test]
    fn crlf_and_padding_are_tolerated() {
        assert_eq!(parse(" 100 , 25 \r\n").unwrap(), Reading::echo(10, 25));
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        assert_eq!(parse("90").unwrap_err(), DecodeError::FieldCount(1));
        assert_eq!(parse("90,30,1").unwrap_err(), DecodeError::FieldCount(3));
        assert_eq!(parse("").unwrap_err(), DecodeError::FieldCount(1));
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        assert!(matches!(
            parse("ab,30").unwrap_err(),
            DecodeError::InvalidAngle(_)
        ));
        assert!(matches!(
            parse("90,far").unwrap_err(),
            DecodeError::InvalidDistance(_)
        ));
        assert!(matches!(
            parse("90,-5").unwrap_err(),
            DecodeError::InvalidDistance(_)
        ));
    }

    #[test]
    fn angles_outside_servo_range_are_rejected() {
        assert_eq!(parse("181,10").unwrap_err(), DecodeError::AngleOutOfRange(181));
        assert_eq!(parse("-1,10").unwrap_err(), DecodeError::AngleOutOfRange(-1));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(
            parse_bytes(&[0x39, 0x30, 0x2c, 0xff, b'\n']).unwrap_err(),
            DecodeError::InvalidUtf8
        );
    }

    #[test]
    fn encode_matches_wire_format() {
        assert_eq!(encode(&Reading::echo(0, 30)), "90,30\n");
        assert_eq!(encode(&Reading::no_echo(-90)), "0,-\n");
        assert_eq!(parse(&encode(&Reading::echo(90, 12))).unwrap(), Reading::echo(90, 12));
    }
}
