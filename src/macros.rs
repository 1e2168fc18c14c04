// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: literals, consts, vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // String-type concatenation shorthand!
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

#[macro_export]
macro_rules! svec {
    // Vec<String> shorthand for label lists: svec!["草", "無"]
    () => {
        ::std::vec::Vec::<::std::string::String>::new()
    };
    ($($item:expr),+ $(,)?) => {
        vec![$(::std::string::String::from($item)),+]
    };
}
