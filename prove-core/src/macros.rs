/// The location of the macro invocation.
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(file!(), line!(), column!())
    };
}

/// Declares one assertion on a suite.
///
/// ```ignore
/// prove!(suite, 1 + 1 == 2)?;
/// prove!(suite, "sorting is stable", sorted(&input) === expected)?;
/// prove!(suite, greeting() =~ "hello")?;
/// ```
///
/// The expression is split at its first top-level operator token. Operands
/// that contain `<` or `>` themselves (generics, turbofish) must be wrapped in
/// parentheses. Each side is converted with `Value::from` inside a thunk, so
/// `?` may be used in an operand and its error surfaces unchanged when the
/// unit runs.
#[macro_export]
macro_rules! prove {
    ($suite:expr, $description:literal, $($expr:tt)+) => {
        $suite.prove(
            ::core::option::Option::Some($description),
            $crate::__prove_shape!($($expr)+),
            $crate::location!(),
        )
    };
    ($suite:expr, $($expr:tt)+) => {
        $suite.prove(
            ::core::option::Option::None,
            $crate::__prove_shape!($($expr)+),
            $crate::location!(),
        )
    };
}

/// Declares a batch of assertions sharing one description prefix.
///
/// ```ignore
/// batch!(suite, "parser", {
///     setup { reset_fixtures() };
///     prove parse("1") == 1;
///     prove "rejects junk", parse("x").is_err() == true;
/// })?;
/// ```
///
/// Items are separated by `;`. `setup { ... }` blocks are re-run before each
/// later assertion. A nested `batch "prefix" { ... }` is accepted by the
/// macro but rejected at registration.
#[macro_export]
macro_rules! batch {
    (@items $batch:ident;) => {};
    (@items $batch:ident; setup $body:block ; $($rest:tt)*) => {
        $batch.push($crate::Statement::Setup($crate::Setup::new(move || {
            $body;
            ::core::result::Result::Ok(())
        })));
        $crate::batch!(@items $batch; $($rest)*);
    };
    (@items $batch:ident; setup $body:block) => {
        $crate::batch!(@items $batch; setup $body;);
    };
    (@items $batch:ident; batch $prefix:literal { $($inner:tt)* } ; $($rest:tt)*) => {
        {
            #[allow(unused_mut)]
            let mut nested = $crate::Batch::new($prefix, $crate::location!());
            $crate::batch!(@items nested; $($inner)*);
            $batch.push($crate::Statement::Batch(nested));
        }
        $crate::batch!(@items $batch; $($rest)*);
    };
    (@items $batch:ident; batch $prefix:literal { $($inner:tt)* }) => {
        $crate::batch!(@items $batch; batch $prefix { $($inner)* };);
    };
    (@items $batch:ident; prove $description:literal, $($rest:tt)*) => {
        $crate::batch!(@prove $batch [$description] [] $($rest)*);
    };
    (@items $batch:ident; prove $($rest:tt)*) => {
        $crate::batch!(@prove $batch [] [] $($rest)*);
    };

    (@prove $batch:ident [$($description:literal)?] [$($expr:tt)*] ; $($rest:tt)*) => {
        $batch.push($crate::Statement::assertion(
            $crate::batch!(@description $($description)?),
            $crate::__prove_shape!($($expr)*),
            $crate::location!(),
        ));
        $crate::batch!(@items $batch; $($rest)*);
    };
    (@prove $batch:ident [$($description:literal)?] [$($expr:tt)*]) => {
        $crate::batch!(@prove $batch [$($description)?] [$($expr)*] ;);
    };
    (@prove $batch:ident [$($description:literal)?] [$($expr:tt)*] $next:tt $($rest:tt)*) => {
        $crate::batch!(@prove $batch [$($description)?] [$($expr)* $next] $($rest)*);
    };

    (@description) => {
        ::core::option::Option::None
    };
    (@description $description:literal) => {
        ::core::option::Option::Some($description)
    };

    ($suite:expr, $prefix:expr, { $($items:tt)* }) => {{
        #[allow(unused_mut)]
        let mut batch = $crate::Batch::new($prefix, $crate::location!());
        $crate::batch!(@items batch; $($items)*);
        $suite.batch(batch)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __prove_shape {
    (@split [$($left:tt)+] === $($right:tt)+) => {
        $crate::__prove_shape!(@build "===", [$($left)+] [$($right)+])
    };
    (@split [$($left:tt)+] !== $($right:tt)+) => {
        $crate::__prove_shape!(@build "!==", [$($left)+] [$($right)+])
    };
    (@split [$($left:tt)+] == $($right:tt)+) => {
        $crate::__prove_shape!(@build "==", [$($left)+] [$($right)+])
    };
    (@split [$($left:tt)+] != $($right:tt)+) => {
        $crate::__prove_shape!(@build "!=", [$($left)+] [$($right)+])
    };
    (@split [$($left:tt)+] =~ $($right:tt)+) => {
        $crate::__prove_shape!(@build "=~", [$($left)+] [$($right)+])
    };
    (@split [$($left:tt)+] <= $($right:tt)+) => {
        $crate::__prove_shape!(@build "<=", [$($left)+] [$($right)+])
    };
    (@split [$($left:tt)+] >= $($right:tt)+) => {
        $crate::__prove_shape!(@build ">=", [$($left)+] [$($right)+])
    };
    (@split [$($left:tt)+] < $($right:tt)+) => {
        $crate::__prove_shape!(@build "<", [$($left)+] [$($right)+])
    };
    (@split [$($left:tt)+] > $($right:tt)+) => {
        $crate::__prove_shape!(@build ">", [$($left)+] [$($right)+])
    };
    (@split [$($left:tt)*] $next:tt $($rest:tt)*) => {
        $crate::__prove_shape!(@split [$($left)* $next] $($rest)*)
    };
    (@split [$($left:tt)*]) => {
        $crate::Shape::unsupported(stringify!($($left)*))
    };
    (@build $operator:literal, [$($left:tt)+] [$($right:tt)+]) => {
        $crate::Shape::binary(
            stringify!($($left)+),
            $operator,
            stringify!($($right)+),
            $crate::Operand::new(move || ::core::result::Result::Ok($crate::Value::from($($left)+))),
            $crate::Operand::new(move || ::core::result::Result::Ok($crate::Value::from($($right)+))),
        )
    };
    () => {
        $crate::Shape::unsupported("")
    };
    ($($expr:tt)+) => {
        $crate::__prove_shape!(@split [] $($expr)+)
    };
}
