// Software version strings as reported by the appliance.
//
// Versions look like `1.66.2`, `1.38.1-vweb0606-02` or `1.64.10.PH.3`.
// Components are separated by `.`, `_` or `-`; parsing stops at the first
// component that does not start with a digit.

/// Component separators.
const SEPARATORS: [char; 3] = ['.', '_', '-'];

/// Components packed by [`pack_default`].
pub const DEFAULT_PACKED_COMPONENTS: usize = 4;

/// Upper bound on packed components (8 bits each in a `u64`).
pub const MAX_PACKED_COMPONENTS: usize = 8;

/// Outcome of reading one version component.
enum Component {
    /// Whole token was numeric, keep going.
    Number(u32),
    /// Token started with digits followed by something else: take the
    /// leading digits, then stop.
    Last(u32),
    Stop,
}

/// Value of a run of ASCII digits, saturating at `u32::MAX`.
fn saturating_digits(run: &str) -> u32 {
    run.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}

fn read_component(token: &str) -> Component {
    let digits = token.len() - token.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    match token.split_at_checked(digits) {
        Some(("", _)) | None => Component::Stop,
        Some((run, "")) => Component::Number(saturating_digits(run)),
        Some((run, _)) => Component::Last(saturating_digits(run)),
    }
}

/// Walk the numeric components of `version`, left to right.
fn components(version: &str) -> impl Iterator<Item = u32> + '_ {
    let mut stopped = false;
    version
        .split(SEPARATORS)
        .filter(|token| !token.is_empty())
        .map_while(move |token| {
            if stopped {
                return None;
            }
            match read_component(token) {
                Component::Number(value) => Some(value),
                Component::Last(value) => {
                    stopped = true;
                    Some(value)
                }
                Component::Stop => None,
            }
        })
}

/// Numeric components of a version string.
///
/// ```
/// use argo_api::version::parse_components;
///
/// assert_eq!(parse_components("1.17.6"), vec![1, 17, 6]);
/// assert_eq!(parse_components("1.38.1-vweb0606-02"), vec![1, 38, 1]);
/// assert_eq!(parse_components("x.1.2.3"), Vec::<u32>::new());
/// ```
pub fn parse_components(version: &str) -> Vec<u32> {
    components(version).collect()
}

/// Pack up to `max_components` components into one comparable integer,
/// 8 bits per component, most significant first.
///
/// Components above 255 are clamped. Missing trailing components count as
/// zero, so `pack("1.2", 4) == pack("1.2.0.0", 4)`. `max_components` is
/// capped at [`MAX_PACKED_COMPONENTS`].
pub fn pack(version: &str, max_components: usize) -> u64 {
    let max_components = max_components.min(MAX_PACKED_COMPONENTS);
    let mut value: u64 = 0;
    let mut count = 0;
    for component in components(version).take(max_components) {
        value = (value << 8) | u64::from(component.min(0xFF));
        count += 1;
    }
    for _ in count..max_components {
        value <<= 8;
    }
    value
}

/// [`pack`] with [`DEFAULT_PACKED_COMPONENTS`].
pub fn pack_default(version: &str) -> u64 {
    pack(version, DEFAULT_PACKED_COMPONENTS)
}
